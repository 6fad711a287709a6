//! Article download and extraction.
//!
//! The service accepts arbitrary news URLs, so there is a single generic
//! extractor in [`article`] rather than one scraper per outlet:
//!
//! 1. **Fetching**: download the page with a browser-like user agent
//! 2. **Extraction**: pull title, byline, publication date and body text
//!
//! Extraction is a pure function over the HTML ([`article::parse_article`])
//! so it can be tested without the network.

pub mod article;
