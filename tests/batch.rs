//! Batch orchestration and API boundary tests: order preservation,
//! per-item failure isolation, and the 50-URL cap.

use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use contact_scraper::config::Config;
use contact_scraper::server::build_rocket;
use contact_scraper::{BatchPolicy, FetchPolicy, ScrapeOrchestrator};

fn test_orchestrator() -> ScrapeOrchestrator {
    ScrapeOrchestrator::new(FetchPolicy::for_tests(), BatchPolicy::default())
        .expect("failed to build orchestrator")
}

async fn test_client() -> Client {
    let config = Config {
        scraping: contact_scraper::config::ScrapingConfig {
            fetch: FetchPolicy::for_tests(),
            batch: BatchPolicy::default(),
        },
        ..Default::default()
    };
    Client::tracked(build_rocket(config).unwrap())
        .await
        .expect("failed to build rocket client")
}

const TEAM_PAGE: &str = r#"
    <div class="team-member">
      <h3>Matti Meikäläinen</h3>
      <p>Toimitusjohtaja</p>
      <p>040 123 4567</p>
    </div>"#;

#[tokio::test]
async fn results_preserve_input_order_and_isolate_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TEAM_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forbidden"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let urls = vec![
        format!("{}/ok", server.uri()),
        "this is not a url".to_string(),
        format!("{}/forbidden", server.uri()),
        format!("{}/ok", server.uri()),
    ];

    let results = test_orchestrator().run_batch(&urls).await;

    assert_eq!(results.len(), 4);
    for (result, url) in results.iter().zip(&urls) {
        assert_eq!(&result.url, url);
    }
    assert!(results[0].success);
    assert!(!results[1].success, "malformed URL fails in place");
    assert!(results[1].error.as_deref().unwrap().contains("invalid URL"));
    assert!(!results[2].success);
    assert!(results[2].error.as_deref().unwrap().contains("403"));
    assert!(results[3].success, "failures do not poison siblings");

    let contacts = &results[0].data.as_ref().unwrap().contacts;
    assert_eq!(contacts[0].name, "Matti Meikäläinen");
}

#[tokio::test]
async fn single_scrape_is_the_degenerate_batch_case() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TEAM_PAGE))
        .mount(&server)
        .await;

    let result = test_orchestrator().scrape_one(&server.uri()).await;
    assert!(result.success);
    assert_eq!(
        result.data.unwrap().contacts[0].phone.as_deref(),
        Some("+358401234567")
    );
}

#[tokio::test]
async fn batch_of_51_is_rejected_before_any_fetch() {
    let client = test_client().await;
    // The URLs point nowhere; a rejection at the boundary must not try them.
    let urls: Vec<String> = (0..51).map(|i| format!("https://site{}.example", i)).collect();

    let response = client
        .post("/api/scrape/batch")
        .header(ContentType::JSON)
        .body(json!({ "urls": urls }).to_string())
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::BadRequest);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn batch_of_exactly_50_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TEAM_PAGE))
        .expect(50)
        .mount(&server)
        .await;

    let client = test_client().await;
    let urls: Vec<String> = (0..50).map(|i| format!("{}/page{}", server.uri(), i)).collect();

    let response = client
        .post("/api/scrape/batch")
        .header(ContentType::JSON)
        .body(json!({ "urls": urls }).to_string())
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["results"].as_array().unwrap().len(), 50);
}

#[tokio::test]
async fn single_scrape_rejects_malformed_url_with_400() {
    let client = test_client().await;

    let response = client
        .post("/api/scrape")
        .header(ContentType::JSON)
        .body(json!({ "url": "definitely not a url" }).to_string())
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::BadRequest);
}

#[tokio::test]
async fn csv_upload_drives_a_batch_and_exports_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TEAM_PAGE))
        .mount(&server)
        .await;

    let client = test_client().await;
    let content = format!("URL\n{}/a\n{}/b\n", server.uri(), server.uri());

    let response = client
        .post("/api/scrape/csv")
        .header(ContentType::JSON)
        .body(json!({ "filename": "urls.csv", "content": content }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.unwrap();
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);

    // Feed the results straight back into the exporter.
    let response = client
        .post("/api/export/csv")
        .header(ContentType::JSON)
        .body(json!({ "results": results }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let csv = response.into_string().await.unwrap();
    assert!(csv.starts_with("URL,Name,Title,Phone,Email,Error"));
    assert!(csv.contains("Matti Meikäläinen"));
}

#[rocket::get("/boom")]
fn boom() -> &'static str {
    panic!("handler blew up");
}

#[tokio::test]
async fn unexpected_handler_failure_answers_500_with_scrape_result_body() {
    let config = Config {
        scraping: contact_scraper::config::ScrapingConfig {
            fetch: FetchPolicy::for_tests(),
            batch: BatchPolicy::default(),
        },
        ..Default::default()
    };
    // A deliberately panicking route stands in for "unexpected failure";
    // the registered catcher must still answer with a parseable result.
    let rocket = build_rocket(config)
        .unwrap()
        .mount("/api", rocket::routes![boom]);
    let client = Client::tracked(rocket).await.unwrap();

    let response = client.get("/api/boom").dispatch().await;

    assert_eq!(response.status(), Status::InternalServerError);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("unexpected internal error"));
}

#[tokio::test]
async fn csv_upload_with_wrong_extension_is_rejected() {
    let client = test_client().await;

    let response = client
        .post("/api/scrape/csv")
        .header(ContentType::JSON)
        .body(json!({ "filename": "urls.xlsx", "content": "https://a.fi\n" }).to_string())
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::BadRequest);
}
