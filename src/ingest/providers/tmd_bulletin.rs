//! TMD earthquake-warning bulletin page (HTML).
//!
//! The page lists one anchor pair per event, both linking to a detail URL
//! that ends in a 12-digit `DDMMYYYYHHmm` token: the first anchor carries
//! the headline (location label, often with a magnitude phrase), the second
//! the description. That token grammar is the only thing extraction relies
//! on; layout classes can churn without breaking it.

use metrics::histogram;
use once_cell::sync::OnceCell;
use regex::Regex;

use crate::error::FetchError;
use crate::ingest::types::{RawRecord, SourceProvider};

pub const DEFAULT_URL: &str = "https://www.tmd.go.th/warning-and-events/warning-earthquake";

fn anchor_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)<a[^>]+href="([^"]*/(\d{12}))"[^>]*>(.*?)</a>"#).unwrap()
    })
}

fn tags_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").unwrap())
}

fn ws_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Strip nested tags, decode entities, collapse whitespace.
fn clean_fragment(s: &str) -> String {
    let no_tags = tags_re().replace_all(s, " ");
    let decoded = html_escape::decode_html_entities(&no_tags).to_string();
    ws_re().replace_all(&decoded, " ").trim().to_string()
}

pub struct TmdBulletinProvider {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

impl TmdBulletinProvider {
    /// Parse from a captured page body; used by tests.
    pub fn from_fixture_str(s: &str) -> Self {
        Self {
            mode: Mode::Fixture(s.to_string()),
        }
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            mode: Mode::Http {
                url: url.into(),
                client: reqwest::Client::new(),
            },
        }
    }

    pub fn parse_records_from_str(html: &str) -> Result<Vec<RawRecord>, FetchError> {
        let t0 = std::time::Instant::now();

        // Anchors sharing one token belong to one row: headline first,
        // description after. Order of first appearance is source order.
        let mut order: Vec<String> = Vec::new();
        let mut rows: std::collections::HashMap<String, (String, Vec<String>)> =
            std::collections::HashMap::new();

        for caps in anchor_re().captures_iter(html) {
            let href = caps[1].to_string();
            let token = caps[2].to_string();
            let text = clean_fragment(&caps[3]);
            let entry = rows.entry(token.clone()).or_insert_with(|| {
                order.push(token);
                (href, Vec::new())
            });
            if !text.is_empty() {
                entry.1.push(text);
            }
        }

        let out = order
            .into_iter()
            .filter_map(|token| {
                let (href, texts) = rows.remove(&token)?;
                let title = texts.first().cloned();
                Some(RawRecord {
                    link: Some(href),
                    region: title,
                    text: Some(texts.join(" ")),
                    timestamp: Some(token),
                    ..RawRecord::default()
                })
            })
            .collect::<Vec<_>>();

        histogram!("ingest_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        Ok(out)
    }
}

#[async_trait::async_trait]
impl SourceProvider for TmdBulletinProvider {
    async fn fetch_latest(&self) -> Result<Vec<RawRecord>, FetchError> {
        match &self.mode {
            Mode::Fixture(s) => Self::parse_records_from_str(s),
            Mode::Http { url, client } => {
                let body = client
                    .get(url)
                    .send()
                    .await?
                    .error_for_status()?
                    .text()
                    .await?;
                Self::parse_records_from_str(&body)
            }
        }
    }

    fn name(&self) -> &'static str {
        "tmd-bulletin"
    }
}
