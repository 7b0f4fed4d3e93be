//! Configuration for the furrow console
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;

/// Furrow - provenance console for agricultural supply-chain tracking
#[derive(Parser, Debug, Clone)]
#[command(name = "furrow")]
#[command(about = "Provenance console for agricultural supply-chain tracking")]
pub struct Args {
    /// Base URL of the supply-chain backend API
    #[arg(long, env = "API_BASE", default_value = "http://localhost:5000/api")]
    pub api_base: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Notification auto-dismiss delay in milliseconds
    #[arg(long, env = "NOTIFY_DISMISS_MS", default_value = "3000")]
    pub notify_dismiss_ms: u64,
}

impl Args {
    /// API base with any trailing slash removed
    pub fn api_base(&self) -> &str {
        self.api_base.trim_end_matches('/')
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.api_base.starts_with("http://") && !self.api_base.starts_with("https://") {
            return Err(format!(
                "API_BASE must be an http(s) URL, got '{}'",
                self.api_base
            ));
        }
        if self.notify_dismiss_ms == 0 {
            return Err("NOTIFY_DISMISS_MS must be greater than zero".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(api_base: &str) -> Args {
        Args {
            api_base: api_base.to_string(),
            log_level: "info".to_string(),
            notify_dismiss_ms: 3000,
        }
    }

    #[test]
    fn test_validate_rejects_non_http_base() {
        assert!(args("ftp://somewhere").validate().is_err());
        assert!(args("http://localhost:5000/api").validate().is_ok());
    }

    #[test]
    fn test_api_base_trims_trailing_slash() {
        assert_eq!(args("http://localhost:5000/api/").api_base(), "http://localhost:5000/api");
    }
}
