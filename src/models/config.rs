//! Configuration model loaded from external sources.

use serde::Deserialize;

/// Shortest secret accepted for signing cookies.
pub const MIN_SECRET_LEN: usize = 64;

fn default_api_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> usize {
    10
}

fn default_search_debounce_ms() -> u64 {
    500
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    /// Cookie domain. Leave empty to scope cookies to the serving host.
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub templates_dir: String,
    pub secret: String,
    /// Base URL of the ticket API, e.g. `http://localhost:3000`.
    pub api_base_url: String,
    #[serde(default = "default_api_timeout_secs")]
    pub api_timeout_secs: u64,
    /// Default number of tickets per listing page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Delay before free-text filters auto-submit.
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default)]
    pub cookie_secure: bool,
}

impl ServerConfig {
    /// Domain attribute for cookies, if one is configured.
    pub fn cookie_domain(&self) -> Option<String> {
        let domain = self.domain.trim();
        if domain.is_empty() || domain == "localhost" {
            None
        } else {
            Some(format!(".{domain}"))
        }
    }

    pub fn check_secret(&self) -> Result<(), String> {
        if self.secret.len() < MIN_SECRET_LEN {
            return Err(format!(
                "secret must be at least {MIN_SECRET_LEN} bytes long, got {}",
                self.secret.len()
            ));
        }
        Ok(())
    }
}
