//! Data models for fetched articles and the analysis report.
//!
//! - [`Article`]: what the extractor pulled out of a page
//! - [`AnalysisReport`]: the JSON body returned for a successful analysis

use crate::config::SentimentMethod;
use crate::sentiment::SentimentReport;
use crate::summarize::SummaryKind;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// An article as extracted from its HTML page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Article {
    /// The URL the article was fetched from.
    pub url: String,
    /// The headline, empty when none could be found.
    pub title: String,
    /// Body text, paragraphs separated by blank lines.
    pub text: String,
    /// Byline names, deduplicated in page order.
    pub authors: Vec<String>,
    /// Publication timestamp when the page declares one.
    pub publish_date: Option<DateTime<FixedOffset>>,
}

/// The result of analyzing a single article.
///
/// The classifier's scores are flattened into the top level, so a polarity
/// report carries `polarity`/`subjectivity` and a compound report carries
/// `compound`/`pos`/`neu`/`neg`. Both carry `sentiment`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub success: bool,
    pub url: String,
    pub title: String,
    pub authors: Vec<String>,
    /// RFC 3339 timestamp, or null.
    pub publish_date: Option<String>,
    pub summary: String,
    /// The strategy that actually produced `summary`.
    pub summary_method: SummaryKind,
    pub sentiment_method: SentimentMethod,
    #[serde(flatten)]
    pub sentiment: SentimentReport,
    pub keywords: Vec<String>,
    /// Word count of the full article text.
    pub original_length: usize,
    /// Word count of the summary.
    pub summary_length: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::SentimentLabel;

    fn report(sentiment: SentimentReport, method: SentimentMethod) -> AnalysisReport {
        AnalysisReport {
            success: true,
            url: "https://example.com/a".to_string(),
            title: "Title".to_string(),
            authors: vec!["Jane Doe".to_string()],
            publish_date: None,
            summary: "Short.".to_string(),
            summary_method: SummaryKind::Extractive,
            sentiment_method: method,
            sentiment,
            keywords: vec!["council".to_string()],
            original_length: 120,
            summary_length: 1,
        }
    }

    #[test]
    fn test_polarity_report_is_flattened() {
        let r = report(
            SentimentReport::Polarity {
                sentiment: SentimentLabel::Positive,
                polarity: 0.25,
                subjectivity: 0.5,
            },
            SentimentMethod::Polarity,
        );
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["success"], true);
        assert_eq!(v["sentiment"], "Positive");
        assert_eq!(v["polarity"], 0.25);
        assert_eq!(v["subjectivity"], 0.5);
        assert_eq!(v["summary_method"], "extractive");
        assert_eq!(v["sentiment_method"], "polarity");
        assert!(v["publish_date"].is_null());
        assert!(v.get("compound").is_none());
    }

    #[test]
    fn test_compound_report_is_flattened() {
        let r = report(
            SentimentReport::Compound {
                sentiment: SentimentLabel::Negative,
                compound: -0.42,
                pos: 0.1,
                neu: 0.7,
                neg: 0.2,
            },
            SentimentMethod::Compound,
        );
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["sentiment"], "Negative");
        assert_eq!(v["compound"], -0.42);
        assert_eq!(v["neg"], 0.2);
        assert!(v.get("polarity").is_none());
    }
}
