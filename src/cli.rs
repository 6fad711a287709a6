//! Command-line interface.
//!
//! ```sh
//! # Serve the web UI and API on the configured address
//! article_lens serve
//!
//! # Same, with a config file and a different port
//! article_lens -c lens.yaml serve --bind 127.0.0.1:8080
//!
//! # Analyze one article and print the report
//! article_lens analyze https://example.com/news/story --summary-method extractive
//! ```

use crate::config::{SentimentMethod, Settings, SummaryMethod};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML settings file
    #[arg(short, long, env = "LENS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server
    Serve {
        /// Address to bind, overriding the settings file
        #[arg(short, long)]
        bind: Option<String>,

        /// Request log path, overriding the settings file
        #[arg(long)]
        request_log: Option<PathBuf>,
    },

    /// Analyze a single article and print the report as JSON
    Analyze {
        /// Article URL
        url: String,

        #[arg(long, value_enum)]
        summary_method: Option<SummaryMethod>,

        #[arg(long, value_enum)]
        sentiment_method: Option<SentimentMethod>,
    },
}

impl Command {
    /// Fold server overrides into `settings`.
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Command::Serve { bind, request_log } = self {
            if let Some(bind) = bind {
                settings.bind = bind.clone();
            }
            if let Some(path) = request_log {
                settings.request_log = path.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::parse_from(["article_lens", "serve"]);
        assert!(matches!(
            cli.command,
            Command::Serve {
                bind: None,
                request_log: None
            }
        ));
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::parse_from([
            "article_lens",
            "serve",
            "--bind",
            "127.0.0.1:8080",
            "--request-log",
            "/tmp/requests.log",
        ]);

        let mut settings = Settings::default();
        cli.command.apply_overrides(&mut settings);
        assert_eq!(settings.bind, "127.0.0.1:8080");
        assert_eq!(settings.request_log, PathBuf::from("/tmp/requests.log"));
    }

    #[test]
    fn test_analyze_with_methods() {
        let cli = Cli::parse_from([
            "article_lens",
            "analyze",
            "https://example.com/story",
            "--summary-method",
            "extractive",
            "--sentiment-method",
            "compound",
        ]);

        match cli.command {
            Command::Analyze {
                url,
                summary_method,
                sentiment_method,
            } => {
                assert_eq!(url, "https://example.com/story");
                assert_eq!(summary_method, Some(SummaryMethod::Extractive));
                assert_eq!(sentiment_method, Some(SentimentMethod::Compound));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_config_flag_after_subcommand() {
        let cli = Cli::parse_from(["article_lens", "serve", "-c", "lens.yaml"]);
        assert_eq!(cli.config, Some(PathBuf::from("lens.yaml")));
    }

    #[test]
    fn test_analyze_overrides_leave_settings_alone() {
        let cli = Cli::parse_from(["article_lens", "analyze", "https://example.com/"]);
        let mut settings = Settings::default();
        cli.command.apply_overrides(&mut settings);
        assert_eq!(settings.bind, "0.0.0.0:5000");
    }

    #[test]
    fn test_unknown_method_rejected() {
        let result = Cli::try_parse_from([
            "article_lens",
            "analyze",
            "https://example.com/",
            "--summary-method",
            "psychic",
        ]);
        assert!(result.is_err());
    }
}
