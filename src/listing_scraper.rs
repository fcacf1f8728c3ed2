// src/listing_scraper.rs
//! Extracts job cards from saved listing pages into the 8-column job CSV

use anyhow::{Context, Result};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use crate::app_log;
use crate::core::FsOps;

pub const LISTING_CSV_HEADER: [&str; 8] = [
    "Job Title",
    "Company",
    "Location",
    "Workplace Type",
    "Benefits",
    "Job Insight",
    "Footer Chips",
    "URL",
];

const DEFAULT_ORIGIN: &str = "https://www.linkedin.com";

const CARD_SELECTORS: &[&str] = &[
    "li.jobs-search-results__list-item",
    "li.scaffold-layout__list-item",
    "div.job-card-container",
    "div.base-card",
];

const TITLE_SELECTORS: &[&str] = &[
    ".job-card-list__title",
    ".job-card-list__title--link",
    ".base-search-card__title",
    "a.job-card-container__link strong",
    "h3",
];

const COMPANY_SELECTORS: &[&str] = &[
    ".artdeco-entity-lockup__subtitle",
    ".job-card-container__primary-description",
    ".base-search-card__subtitle",
    "h4",
];

const METADATA_SELECTORS: &[&str] = &[
    ".job-card-container__metadata-wrapper li",
    ".job-card-container__metadata-item",
    ".artdeco-entity-lockup__caption",
    ".job-search-card__location",
];

const INSIGHT_SELECTORS: &[&str] = &[
    ".job-card-list__insight",
    ".job-card-container__job-insight-text",
];

const FOOTER_SELECTORS: &[&str] = &[
    ".job-card-container__footer-item",
    ".job-card-list__footer-wrapper li",
];

const LINK_SELECTORS: &[&str] = &[
    "a.job-card-container__link",
    "a.job-card-list__title",
    "a.base-card__full-link",
    "a[href*='/jobs/view/']",
];

static WORKPLACE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\((hybrid|remote|on[- ]?site)\)").expect("valid regex")
});

static CURRENT_JOB_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"currentJobId=(\d+)").expect("valid regex"));

/// One visible listing card; field renames are the CSV header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListingCard {
    #[serde(rename = "Job Title")]
    pub title: String,
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Workplace Type")]
    pub workplace_type: String,
    #[serde(rename = "Benefits")]
    pub benefits: String,
    #[serde(rename = "Job Insight")]
    pub insight: String,
    #[serde(rename = "Footer Chips")]
    pub footer_chips: String,
    #[serde(rename = "URL")]
    pub url: String,
}

pub struct ListingScraper {
    origin: String,
}

impl Default for ListingScraper {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingScraper {
    pub fn new() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
        }
    }

    pub fn with_origin(mut self, origin: &str) -> Self {
        self.origin = origin.trim_end_matches('/').to_string();
        self
    }

    /// Every card with a job link, in page order
    pub fn parse_page(&self, html: &str) -> Vec<ListingCard> {
        let document = Html::parse_document(html);

        for selector_str in CARD_SELECTORS {
            let Ok(selector) = Selector::parse(selector_str) else {
                continue;
            };
            let cards: Vec<ListingCard> = document
                .select(&selector)
                .filter_map(|card| self.parse_card(card))
                .collect();
            if !cards.is_empty() {
                app_log!(info, "Found {} listing cards via {}", cards.len(), selector_str);
                return cards;
            }
        }

        app_log!(warn, "No listing cards found on page");
        Vec::new()
    }

    fn parse_card(&self, card: ElementRef) -> Option<ListingCard> {
        let href = find_attr_by_selectors(card, LINK_SELECTORS, "href")?;
        let url = self.normalize_job_url(&href);

        let title = find_text_by_selectors(card, TITLE_SELECTORS)
            .map(|t| collapse_repeated(&t))
            .unwrap_or_default();
        let company = find_text_by_selectors(card, COMPANY_SELECTORS).unwrap_or_default();

        let metadata = all_texts_by_selectors(card, METADATA_SELECTORS);
        let (benefits, places): (Vec<String>, Vec<String>) =
            metadata.into_iter().partition(|item| is_benefit(item));
        let raw_location = places.into_iter().next().unwrap_or_default();
        let (location, workplace_type) = split_workplace(&raw_location);

        Some(ListingCard {
            title,
            company,
            location,
            workplace_type,
            benefits: benefits.join(" | "),
            insight: find_text_by_selectors(card, INSIGHT_SELECTORS).unwrap_or_default(),
            footer_chips: all_texts_by_selectors(card, FOOTER_SELECTORS).join(" | "),
            url,
        })
    }

    /// Absolute `/jobs/view/<id>/` style URL without query or fragment
    pub fn normalize_job_url(&self, href: &str) -> String {
        let href = href.trim();
        if let Some(caps) = CURRENT_JOB_ID.captures(href) {
            return format!("{}/jobs/view/{}/", self.origin, &caps[1]);
        }

        let absolute = if href.starts_with('/') {
            format!("{}{}", self.origin, href)
        } else {
            href.to_string()
        };
        absolute
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string()
    }
}

/// Accumulates cards across pages, first occurrence of a URL wins
#[derive(Debug, Default)]
pub struct ListingAccumulator {
    cards: Vec<ListingCard>,
    seen: HashSet<String>,
}

impl ListingAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many cards were new
    pub fn add_page(&mut self, cards: Vec<ListingCard>) -> usize {
        let before = self.cards.len();
        for card in cards {
            if self.seen.insert(card.url.clone()) {
                self.cards.push(card);
            }
        }
        self.cards.len() - before
    }

    pub fn cards(&self) -> &[ListingCard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn to_csv_string(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        if self.cards.is_empty() {
            writer
                .write_record(LISTING_CSV_HEADER)
                .context("Failed to write CSV header")?;
        }
        for card in &self.cards {
            writer
                .serialize(card)
                .context("Failed to write listing row")?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV: {}", e))?;
        String::from_utf8(bytes).context("CSV output was not UTF-8")
    }

    pub async fn write_csv(&self, path: &Path) -> Result<()> {
        let csv = self.to_csv_string()?;
        FsOps::write_file_safe(path, &csv).await
    }
}

fn find_text_by_selectors(scope: ElementRef, selectors: &[&str]) -> Option<String> {
    for selector_str in selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = scope.select(&selector).next() {
                let text = clean_text(&element.text().collect::<Vec<_>>().join(" "));
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
    }
    None
}

fn all_texts_by_selectors(scope: ElementRef, selectors: &[&str]) -> Vec<String> {
    for selector_str in selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            let texts: Vec<String> = scope
                .select(&selector)
                .map(|element| clean_text(&element.text().collect::<Vec<_>>().join(" ")))
                .filter(|text| !text.is_empty())
                .collect();
            if !texts.is_empty() {
                return texts;
            }
        }
    }
    Vec::new()
}

fn find_attr_by_selectors(scope: ElementRef, selectors: &[&str], attr: &str) -> Option<String> {
    selectors
        .iter()
        .filter_map(|selector_str| Selector::parse(selector_str).ok())
        .find_map(|selector| {
            scope
                .select(&selector)
                .find_map(|element| element.value().attr(attr))
                .map(str::to_string)
        })
}

fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cards repeat the title in a visually hidden span
fn collapse_repeated(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let half = words.len() / 2;
    if words.len() % 2 == 0 && half > 0 && words[..half] == words[half..] {
        words[..half].join(" ")
    } else {
        text.to_string()
    }
}

fn is_benefit(item: &str) -> bool {
    let lower = item.to_lowercase();
    item.contains('$') || lower.contains("benefit") || lower.contains("/yr") || lower.contains("/hr")
}

fn split_workplace(location: &str) -> (String, String) {
    match WORKPLACE_MARKER.captures(location) {
        Some(caps) => {
            let workplace = match caps[1].to_lowercase().as_str() {
                "hybrid" => "Hybrid".to_string(),
                "remote" => "Remote".to_string(),
                _ => "On-site".to_string(),
            };
            let cleaned = clean_text(&WORKPLACE_MARKER.replace(location, ""));
            (cleaned, workplace)
        }
        None => (location.to_string(), String::new()),
    }
}
