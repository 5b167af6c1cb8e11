// src/scraper/extractor.rs
use crate::models::{ContactRecord, ExtractionResult, Person};
use crate::scraper::normalizer;
use crate::scraper::patterns::PatternMatcher;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::debug;

const MAX_CONTACTS: usize = 10;
const MAX_PEOPLE: usize = 10;

pub struct Extractor {
    matcher: PatternMatcher,
    region_selector: Selector,
    landmark_selector: Selector,
    tel_selector: Selector,
    mailto_selector: Selector,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    pub fn new() -> Self {
        Self {
            matcher: PatternMatcher::new(),
            region_selector: Selector::parse("body, section, div, article, li, td, tr, p").unwrap(),
            landmark_selector: Selector::parse("footer, address").unwrap(),
            tel_selector: Selector::parse(r#"a[href^="tel:"]"#).unwrap(),
            mailto_selector: Selector::parse(r#"a[href^="mailto:"]"#).unwrap(),
        }
    }

    /// Runs both extraction passes over one page.
    ///
    /// The grouped pass associates fields within a contact-bearing region;
    /// the flattened pass sweeps the whole page so phones/emails scattered
    /// outside any recognizable region still surface. The two are computed
    /// independently and are allowed to disagree.
    pub fn extract(&self, html: &str) -> ExtractionResult {
        let document = Html::parse_document(html);

        let contacts = self.extract_grouped(&document);
        let (phone_numbers, email_addresses) = self.extract_flattened(&document);
        let people = self.extract_people(&document);

        debug!(
            contacts = contacts.len(),
            phones = phone_numbers.len(),
            emails = email_addresses.len(),
            people = people.len(),
            "extraction complete"
        );

        ExtractionResult {
            contacts,
            phone_numbers,
            email_addresses,
            people,
        }
    }

    /// Grouped pass: one ContactRecord at most per contact-bearing region,
    /// fields drawn only from that region. Structured regions (class/id
    /// tokens, footer/address landmarks) are scanned before the
    /// co-occurrence catch-all, so they win dedup priority.
    fn extract_grouped(&self, document: &Html) -> Vec<ContactRecord> {
        let mut contacts = Vec::new();
        let mut seen_names: HashSet<String> = HashSet::new();

        let structured: Vec<ElementRef> = document
            .select(&self.region_selector)
            .filter(|el| self.is_structured_region(el))
            .chain(document.select(&self.landmark_selector))
            .collect();

        for region in &structured {
            self.take_region_contact(region, &mut contacts, &mut seen_names);
            if contacts.len() >= MAX_CONTACTS {
                return contacts;
            }
        }

        // Catch-all: anything whose own text pairs a name with a phone or
        // an email, regardless of markup.
        for region in document.select(&self.region_selector) {
            let text = element_text(&region);
            if self.matcher.looks_contact_bearing(&text) {
                self.take_region_contact(&region, &mut contacts, &mut seen_names);
                if contacts.len() >= MAX_CONTACTS {
                    break;
                }
            }
        }

        contacts
    }

    fn is_structured_region(&self, el: &ElementRef) -> bool {
        for attr in ["class", "id"] {
            if let Some(value) = el.value().attr(attr) {
                if self.matcher.is_contact_class(value) {
                    return true;
                }
            }
        }
        false
    }

    /// Derives at most one record from a region: name required, the rest
    /// optional and scoped to the region's own text and links.
    fn take_region_contact(
        &self,
        region: &ElementRef,
        contacts: &mut Vec<ContactRecord>,
        seen_names: &mut HashSet<String>,
    ) {
        let text = element_text(region);
        let Some(name) = self.matcher.find_name(&text) else {
            return;
        };
        // First occurrence wins; later regions repeating the name (nested
        // wrappers, footers) do not overwrite it.
        if !seen_names.insert(name.to_lowercase()) {
            return;
        }

        let mut record = ContactRecord::new(name);
        if let Some(title) = self.matcher.find_title(&text) {
            record.title = title;
        }
        record.phone = self
            .matcher
            .find_phone(&text)
            .or_else(|| self.tel_links(region).into_iter().next())
            .map(|p| normalizer::normalize_phone(&p));
        record.email = self
            .matcher
            .find_email(&text)
            .or_else(|| self.mailto_links(region).into_iter().next());

        contacts.push(record);
    }

    /// Flattened pass: every phone and email on the page, from `tel:` /
    /// `mailto:` links and from the raw text, set-deduplicated in
    /// encounter order.
    fn extract_flattened(&self, document: &Html) -> (Vec<String>, Vec<String>) {
        let page_text = document_text(document);
        let root = document.root_element();

        let mut phones = Vec::new();
        let mut seen_phones = HashSet::new();
        for raw in self
            .tel_links(&root)
            .into_iter()
            .chain(self.matcher.find_all_phones(&page_text))
        {
            let normalized = normalizer::normalize_phone(&raw);
            if seen_phones.insert(normalized.clone()) {
                phones.push(normalized);
            }
        }

        let mut emails = Vec::new();
        let mut seen_emails = HashSet::new();
        for email in self
            .mailto_links(&root)
            .into_iter()
            .chain(self.matcher.find_all_emails(&page_text))
        {
            if seen_emails.insert(email.clone()) {
                emails.push(email);
            }
        }

        (phones, emails)
    }

    /// Flattened (name, title) pairs from contact-style sections only.
    fn extract_people(&self, document: &Html) -> Vec<Person> {
        let mut people = Vec::new();
        let mut seen = HashSet::new();

        let regions = document
            .select(&self.region_selector)
            .filter(|el| self.is_structured_region(el))
            .chain(document.select(&self.landmark_selector));

        for region in regions {
            let text = element_text(&region);
            let Some(name) = self.matcher.find_name(&text) else {
                continue;
            };
            if !seen.insert(name.to_lowercase()) {
                continue;
            }
            let title = self
                .matcher
                .find_title(&text)
                .unwrap_or_else(|| "unknown".to_string());
            people.push(Person { name, title });
            if people.len() >= MAX_PEOPLE {
                break;
            }
        }

        people
    }

    /// Validated phone numbers from `tel:` hrefs inside `region`, unnormalized.
    fn tel_links(&self, region: &ElementRef) -> Vec<String> {
        region
            .select(&self.tel_selector)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| href.strip_prefix("tel:"))
            .map(str::to_string)
            .filter(|p| normalizer::is_valid_phone(p))
            .collect()
    }

    /// Valid, lowercased addresses from `mailto:` hrefs inside `region`.
    fn mailto_links(&self, region: &ElementRef) -> Vec<String> {
        region
            .select(&self.mailto_selector)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| href.strip_prefix("mailto:"))
            .map(|addr| addr.split('?').next().unwrap_or(addr))
            .map(normalizer::normalize_email)
            .filter(|e| normalizer::is_valid_email(e))
            .collect()
    }
}

fn element_text(el: &ElementRef) -> String {
    el.text().collect::<Vec<_>>().join(" ")
}

fn document_text(document: &Html) -> String {
    document
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ")
}
