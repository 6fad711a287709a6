//! Generic news article fetching and extraction.
//!
//! Unlike a per-outlet scraper, this extractor has to cope with arbitrary
//! pages. It reads structured metadata first (JSON-LD, OpenGraph and
//! `article:*` meta tags) and only falls back to markup heuristics when a
//! page does not declare what it is.
//!
//! # Body text
//!
//! Paragraphs are gathered from the most specific container that holds the
//! bulk of the page's prose (`[itemprop=articleBody]`, `article`, `main`,
//! and a few common body classes). Navigation, headers, footers, asides,
//! forms and figure captions are ignored, as are paragraphs too short to be
//! prose (bylines, "Advertisement", share prompts).

use crate::config::FetchSettings;
use crate::models::Article;
use crate::utils::{clean, truncate_for_log, word_count};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use itertools::Itertools;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument};
use url::Url;

/// Failure to download an article page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to download article: {0}")]
    Http(#[from] reqwest::Error),
}

const ARTICLE_TYPES: [&str; 6] = [
    "Article",
    "NewsArticle",
    "ReportageNewsArticle",
    "AnalysisNewsArticle",
    "BlogPosting",
    "Report",
];

const BODY_CANDIDATES: [&str; 9] = [
    r#"[itemprop="articleBody"]"#,
    "article",
    ".article-body",
    ".article__content",
    ".story-body",
    ".post-content",
    ".entry-content",
    "main",
    "#content",
];

const SKIPPED_ANCESTORS: [&str; 7] = ["nav", "header", "footer", "aside", "form", "figure", "noscript"];

const MIN_PARAGRAPH_WORDS: usize = 4;

/// Build the HTTP client used for article downloads.
pub fn build_client(settings: &FetchSettings) -> Result<Client, FetchError> {
    let client = Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()?;
    Ok(client)
}

/// Download `url` and extract its article.
///
/// A page that downloads fine but carries no recognizable prose yields an
/// [`Article`] with empty `text`; deciding whether that is enough is the
/// caller's business.
///
/// # Arguments
///
/// * `client` - Client from [`build_client`], carrying user agent and timeout
/// * `url` - Absolute `http` or `https` URL of the article
///
/// # Errors
///
/// Returns [`FetchError::Http`] on connection failures, timeouts, non-2xx
/// statuses and unreadable bodies.
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn fetch_article(client: &Client, url: &str) -> Result<Article, FetchError> {
    let response = client.get(url).send().await?.error_for_status()?;
    let final_url = response.url().to_string();
    let body = response.text().await?;
    debug!(bytes = body.len(), %final_url, "Downloaded article page");

    let article = parse_article(url, &body);
    info!(
        title = %truncate_for_log(&article.title, 120),
        words = word_count(&article.text),
        authors = article.authors.len(),
        has_date = article.publish_date.is_some(),
        "Parsed article"
    );
    Ok(article)
}

/// Extract an [`Article`] from an HTML document.
pub fn parse_article(url: &str, html: &str) -> Article {
    let document = Html::parse_document(html);
    let linked_data = json_ld_blocks(&document);

    Article {
        url: url.to_string(),
        title: extract_title(&document),
        text: extract_text(&document),
        authors: extract_authors(&document, &linked_data),
        publish_date: extract_publish_date(&document, &linked_data),
    }
}

/* -------------------- JSON-LD -------------------- */

fn json_ld_blocks(document: &Html) -> Vec<Value> {
    let mut out = Vec::new();
    let Ok(sel) = Selector::parse(r#"script[type="application/ld+json"]"#) else {
        return out;
    };
    for script in document.select(&sel) {
        let raw = script.text().collect::<String>();
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(raw) {
            Ok(v) => flatten_ld(v, &mut out),
            Err(e) => debug!(error = %e, "Skipping malformed JSON-LD block"),
        }
    }
    out
}

fn flatten_ld(v: Value, out: &mut Vec<Value>) {
    match v {
        Value::Array(items) => {
            for item in items {
                flatten_ld(item, out);
            }
        }
        Value::Object(mut map) => {
            if let Some(graph) = map.remove("@graph") {
                flatten_ld(graph, out);
            }
            out.push(Value::Object(map));
        }
        _ => {}
    }
}

fn is_article_type(v: &Value) -> bool {
    match v.get("@type") {
        Some(Value::String(t)) => ARTICLE_TYPES.contains(&t.as_str()),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(|t| ARTICLE_TYPES.contains(&t)),
        _ => false,
    }
}

/* -------------------- TITLE -------------------- */

fn extract_title(document: &Html) -> String {
    meta_content(document, r#"meta[property="og:title"]"#)
        .or_else(|| text_of_first(document, "title"))
        .or_else(|| text_of_first(document, "h1"))
        .unwrap_or_default()
}

/* -------------------- AUTHORS -------------------- */

fn extract_authors(document: &Html, linked_data: &[Value]) -> Vec<String> {
    let mut raw = Vec::<String>::new();

    for v in linked_data.iter().filter(|v| is_article_type(v)) {
        if let Some(author) = v.get("author") {
            collect_ld_names(author, &mut raw);
        }
    }
    for css in [r#"meta[name="author"]"#, r#"meta[property="article:author"]"#] {
        let Ok(sel) = Selector::parse(css) else { continue };
        raw.extend(
            document
                .select(&sel)
                .filter_map(|m| m.value().attr("content"))
                .filter(|c| !looks_like_url(c))
                .map(str::to_string),
        );
    }

    // Markup bylines are noisy; only consult them when nothing structured exists.
    if raw.is_empty() {
        for css in [
            r#"[itemprop="author"] [itemprop="name"]"#,
            r#"a[rel="author"]"#,
            ".byline__name",
            ".byline",
        ] {
            let Ok(sel) = Selector::parse(css) else { continue };
            raw.extend(document.select(&sel).map(element_text));
            if !raw.is_empty() {
                break;
            }
        }
    }

    raw.iter()
        .flat_map(|r| split_names(r))
        .unique_by(|name| name.to_lowercase())
        .collect()
}

fn collect_ld_names(v: &Value, out: &mut Vec<String>) {
    match v {
        Value::String(s) => out.push(s.clone()),
        Value::Object(map) => {
            if let Some(name) = map.get("name").and_then(Value::as_str) {
                out.push(name.to_string());
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_ld_names(item, out);
            }
        }
        _ => {}
    }
}

fn split_names(raw: &str) -> Vec<String> {
    let raw = clean(raw);
    let stripped = match raw.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("by ") => &raw[3..],
        _ => raw.as_str(),
    };
    stripped
        .split(',')
        .flat_map(|part| part.split(" and "))
        .flat_map(|part| part.split(" & "))
        .map(clean)
        .filter(|name| looks_like_name(name))
        .collect()
}

fn looks_like_name(s: &str) -> bool {
    let words = word_count(s);
    (1..=5).contains(&words)
        && s.chars().any(char::is_alphabetic)
        && !s.chars().any(|c| c.is_ascii_digit())
        && !looks_like_url(s)
}

fn looks_like_url(s: &str) -> bool {
    let s = s.trim();
    s.starts_with("www.")
        || Url::parse(s).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

/* -------------------- DATES -------------------- */

fn extract_publish_date(document: &Html, linked_data: &[Value]) -> Option<DateTime<FixedOffset>> {
    for v in linked_data.iter().filter(|v| is_article_type(v)) {
        for key in ["datePublished", "dateCreated", "dateModified"] {
            if let Some(dt) = v.get(key).and_then(Value::as_str).and_then(parse_date) {
                return Some(dt);
            }
        }
    }

    for css in [
        r#"meta[property="article:published_time"]"#,
        r#"meta[itemprop="datePublished"]"#,
        r#"meta[name="pubdate"]"#,
        r#"meta[name="publish-date"]"#,
        r#"meta[name="date"]"#,
        r#"meta[property="og:updated_time"]"#,
    ] {
        if let Some(dt) = meta_content(document, css).as_deref().and_then(parse_date) {
            return Some(dt);
        }
    }

    let sel = Selector::parse("time[datetime]").ok()?;
    document
        .select(&sel)
        .filter_map(|t| t.value().attr("datetime"))
        .find_map(parse_date)
}

/// Parse the date formats news pages actually use: RFC 3339, ISO 8601 with
/// a colon-less offset, naive ISO datetimes (taken as UTC) and bare dates.
pub fn parse_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc().fixed_offset());
    }
    let date = NaiveDate::parse_from_str(s.get(..10)?, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().fixed_offset())
}

/* -------------------- BODY TEXT -------------------- */

fn extract_text(document: &Html) -> String {
    let Ok(p_sel) = Selector::parse("p") else {
        return String::new();
    };

    let page = Selector::parse("body")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .map(|body| paragraphs_in(body, &p_sel))
        .unwrap_or_default();
    let page_len = text_len(&page);

    let best = BODY_CANDIDATES
        .iter()
        .filter_map(|css| Selector::parse(css).ok())
        .flat_map(|sel| {
            document
                .select(&sel)
                .map(|container| paragraphs_in(container, &p_sel))
                .collect::<Vec<_>>()
        })
        .max_by_key(|paragraphs| text_len(paragraphs));

    let chosen = match best {
        Some(paragraphs) if !paragraphs.is_empty() && text_len(&paragraphs) * 2 >= page_len => {
            paragraphs
        }
        _ => page,
    };
    chosen.join("\n\n")
}

fn paragraphs_in(container: ElementRef<'_>, p_sel: &Selector) -> Vec<String> {
    container
        .select(p_sel)
        .filter(|p| !inside_skipped_block(*p, container))
        .map(element_text)
        .filter(|text| word_count(text) >= MIN_PARAGRAPH_WORDS)
        .dedup()
        .collect()
}

fn inside_skipped_block(p: ElementRef<'_>, container: ElementRef<'_>) -> bool {
    p.ancestors()
        .take_while(|node| node.id() != container.id())
        .filter_map(|node| node.value().as_element())
        .any(|el| SKIPPED_ANCESTORS.contains(&el.name()))
}

fn text_len(paragraphs: &[String]) -> usize {
    paragraphs.iter().map(String::len).sum()
}

/* -------------------- MISC HELPERS -------------------- */

fn element_text(el: ElementRef<'_>) -> String {
    clean(&el.text().collect::<String>())
}

fn meta_content(document: &Html, css: &str) -> Option<String> {
    let sel = Selector::parse(css).ok()?;
    document
        .select(&sel)
        .filter_map(|m| m.value().attr("content"))
        .map(clean)
        .find(|s| !s.is_empty())
}

fn text_of_first(document: &Html, css: &str) -> Option<String> {
    let sel = Selector::parse(css).ok()?;
    document
        .select(&sel)
        .map(element_text)
        .find(|s| !s.is_empty())
}
