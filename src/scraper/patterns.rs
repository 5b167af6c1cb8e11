// src/scraper/patterns.rs
//
// Pure text predicates: no network, no DOM state. Each field type gets a
// small ordered detector table so the priority between patterns is explicit
// and each one is unit-testable on its own.
use crate::scraper::normalizer;
use regex::Regex;

/// Job-title keywords, checked in order: specific compound titles before the
/// generic words they contain, Finnish before English. First hit wins.
const TITLE_KEYWORDS: &[&str] = &[
    "toimitusjohtaja",
    "talousjohtaja",
    "myyntijohtaja",
    "markkinointijohtaja",
    "kehitysjohtaja",
    "henkilöstöjohtaja",
    "myyntipäällikkö",
    "markkinointipäällikkö",
    "projektipäällikkö",
    "tuotepäällikkö",
    "aluepäällikkö",
    "asiakkuuspäällikkö",
    "toimistopäällikkö",
    "päällikkö",
    "johtaja",
    "asiantuntija",
    "suunnittelija",
    "koordinaattori",
    "assistentti",
    "yrittäjä",
    "managing director",
    "sales manager",
    "project manager",
    "ceo",
    "cto",
    "cfo",
    "coo",
    "founder",
    "partner",
    "director",
    "manager",
    "specialist",
    "consultant",
    "engineer",
    "designer",
    "developer",
];

/// Class/id tokens marking a subtree as likely contact-bearing.
const REGION_TOKENS: &[&str] = &[
    "contact",
    "team",
    "staff",
    "employee",
    "person",
    "people",
    "member",
    "card",
    "henkilöstö",
    "henkilökunta",
    "henkilosto",
    "henkilokunta",
    "yhteystiedot",
    "yhteystieto",
    "tiimi",
];

pub struct PatternMatcher {
    name_patterns: Vec<Regex>,
    phone_patterns: Vec<Regex>,
    email_regex: Regex,
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternMatcher {
    pub fn new() -> Self {
        Self {
            // Finnish orthography first (Ä/Ö/Å count as uppercase), plain
            // ASCII pair as the international fallback. Order is priority.
            name_patterns: vec![
                Regex::new(
                    r"\b[A-ZÄÖÅ][a-zäöåé]+(?:-[A-ZÄÖÅ][a-zäöåé]+)?(?: [A-ZÄÖÅ][a-zäöåé]+(?:-[A-ZÄÖÅ][a-zäöåé]+)?){1,2}\b",
                )
                .unwrap(),
                Regex::new(r"\b[A-Z][a-z]+ [A-Z][a-z]+\b").unwrap(),
            ],
            phone_patterns: vec![
                Regex::new(r"\+358[ \-.]?\d{1,3}(?:[ \-.]?\d{2,4}){1,3}").unwrap(),
                Regex::new(r"\b0\d{1,2}(?:[ \-.]?\d{2,4}){2,3}\b").unwrap(),
            ],
            email_regex: Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
                .unwrap(),
        }
    }

    /// First name-shaped substring in `text`, highest-priority pattern first.
    pub fn find_name(&self, text: &str) -> Option<String> {
        for pattern in &self.name_patterns {
            if let Some(m) = pattern.find(text) {
                return Some(m.as_str().trim().to_string());
            }
        }
        None
    }

    /// First title keyword contained in `text`, or None. Case-insensitive
    /// substring search; the returned title is the lowercase keyword itself.
    pub fn find_title(&self, text: &str) -> Option<String> {
        let text = text.to_lowercase();
        TITLE_KEYWORDS
            .iter()
            .find(|kw| text.contains(*kw))
            .map(|kw| kw.to_string())
    }

    /// First phone-shaped substring that also validates as a Finnish number.
    pub fn find_phone(&self, text: &str) -> Option<String> {
        for pattern in &self.phone_patterns {
            for m in pattern.find_iter(text) {
                if normalizer::is_valid_phone(m.as_str()) {
                    return Some(m.as_str().to_string());
                }
            }
        }
        None
    }

    /// Every validating phone match in `text`, in match order, unnormalized.
    pub fn find_all_phones(&self, text: &str) -> Vec<String> {
        let mut found = Vec::new();
        for pattern in &self.phone_patterns {
            for m in pattern.find_iter(text) {
                if normalizer::is_valid_phone(m.as_str()) {
                    found.push(m.as_str().to_string());
                }
            }
        }
        found
    }

    /// First email in `text` that survives lowercasing and re-validation.
    pub fn find_email(&self, text: &str) -> Option<String> {
        self.email_regex
            .find_iter(text)
            .map(|m| normalizer::normalize_email(m.as_str()))
            .find(|e| normalizer::is_valid_email(e))
    }

    /// Every valid email in `text`, lowercased, in match order.
    pub fn find_all_emails(&self, text: &str) -> Vec<String> {
        self.email_regex
            .find_iter(text)
            .map(|m| normalizer::normalize_email(m.as_str()))
            .filter(|e| normalizer::is_valid_email(e))
            .collect()
    }

    /// Does this class/id attribute value carry a contact-section token?
    pub fn is_contact_class(&self, attr_value: &str) -> bool {
        let attr = attr_value.to_lowercase();
        REGION_TOKENS.iter().any(|token| attr.contains(token))
    }

    /// Catch-all region test: a name co-occurring with a phone or an email
    /// is contact-bearing no matter what the markup calls itself.
    pub fn looks_contact_bearing(&self, text: &str) -> bool {
        self.find_name(text).is_some()
            && (self.find_phone(text).is_some() || self.find_email(text).is_some())
    }
}
