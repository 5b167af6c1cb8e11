//! Integration tests for the escalating-realism fetcher.
//!
//! Uses `wiremock` to stand up a local HTTP server per test so no real
//! network traffic is made. The test policy zeroes out inter-attempt
//! delays so the full retry loop runs instantly.

use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use contact_scraper::{FetchPolicy, Fetcher, ScrapeError};

fn test_fetcher() -> Fetcher {
    Fetcher::new(FetchPolicy::for_tests()).expect("failed to build test fetcher")
}

#[tokio::test]
async fn delivers_page_body_on_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>moi</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let page = test_fetcher().fetch(&server.uri()).await.unwrap();
    assert_eq!(page.status, 200);
    assert!(page.html.contains("moi"));
}

#[tokio::test]
async fn forbidden_short_circuits_after_one_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1) // non-retryable: no second attempt may happen
        .mount(&server)
        .await;

    let err = test_fetcher().fetch(&server.uri()).await.unwrap_err();
    assert!(matches!(err, ScrapeError::ClientError { status: 403, .. }));
}

#[tokio::test]
async fn not_found_is_terminal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_fetcher().fetch(&server.uri()).await.unwrap_err();
    assert!(matches!(err, ScrapeError::ClientError { status: 404, .. }));
}

#[tokio::test]
async fn server_errors_exhaust_the_attempt_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3) // full budget, one per profile
        .mount(&server)
        .await;

    let err = test_fetcher().fetch(&server.uri()).await.unwrap_err();
    match err {
        ScrapeError::ExhaustedRetries { attempts, last_error } => {
            assert_eq!(attempts, 3);
            assert!(last_error.contains("500"));
        }
        other => panic!("expected ExhaustedRetries, got {:?}", other),
    }
}

#[tokio::test]
async fn recovers_when_a_later_profile_gets_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let page = test_fetcher().fetch(&server.uri()).await.unwrap();
    assert_eq!(page.status, 200);
}

#[tokio::test]
async fn profiles_shed_browser_realism_per_attempt() {
    let server = MockServer::start().await;
    // Mocks are matched in mount order, so each attempt falls through to
    // the first mock its header set still satisfies.
    //
    // Attempt 1: full disguise — Sec-Fetch-* plus a search-engine referer.
    Mock::given(method("GET"))
        .and(header_exists("Sec-Fetch-Mode"))
        .and(header("Referer", "https://www.google.com/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    // Attempt 2: the user-agent survives but the Sec-Fetch-* set is gone.
    Mock::given(method("GET"))
        .and(header_exists("User-Agent"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    // Attempt 3: a completely plain request, no custom headers at all.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let page = test_fetcher().fetch(&server.uri()).await.unwrap();
    assert_eq!(page.status, 200);
}

#[tokio::test]
async fn sub_500_statuses_are_delivered_to_the_extractor() {
    // 3xx-free case: a 200 error page is still a page.
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Tilapäinen häiriö"))
        .mount(&server)
        .await;

    let page = test_fetcher().fetch(&server.uri()).await.unwrap();
    assert!(page.html.contains("häiriö"));
}

#[tokio::test]
async fn connection_refused_is_terminal() {
    // Port 1 on localhost refuses connections; the fetcher must stop after
    // the first attempt rather than burn the budget.
    let err = test_fetcher()
        .fetch("http://127.0.0.1:1/")
        .await
        .unwrap_err();
    match err {
        ScrapeError::TransientNetwork(msg) => {
            assert!(
                msg.to_lowercase().contains("connection refused"),
                "unexpected message: {}",
                msg
            );
        }
        other => panic!("expected TransientNetwork, got {:?}", other),
    }
}
