use std::fs;
use std::path::Path;
use std::time::Duration;

use mindhub_client::ClientSettings;
use mindhub_core::{FailurePolicy, PageSize};
use mindhub_logging::{hub_info, hub_warn};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides the configured bearer token.
pub const TOKEN_ENV: &str = "MINDHUB_TOKEN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OnFailure {
    /// Leave the list ready for another load attempt.
    #[default]
    Retry,
    /// Stop loading the list after the first failed fetch.
    Terminal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub bearer_token: Option<String>,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_response_bytes: u64,
    pub page_size: usize,
    /// Server lists use a larger page.
    pub server_page_size: usize,
    pub on_failure: OnFailure,
    /// How long to wait for one backend answer before giving up.
    pub wait_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let settings = ClientSettings::default();
        Self {
            base_url: settings.base_url,
            bearer_token: None,
            connect_timeout_secs: settings.connect_timeout.as_secs(),
            request_timeout_secs: settings.request_timeout.as_secs(),
            max_response_bytes: settings.max_bytes,
            page_size: PageSize::DEFAULT.get(),
            server_page_size: 100,
            on_failure: OnFailure::Retry,
            wait_secs: 45,
        }
    }
}

impl ClientConfig {
    /// Reads the config file; a missing or unreadable file yields defaults.
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                hub_info!("No config at {:?}, using defaults", path);
                return Self::default();
            }
            Err(err) => {
                hub_warn!("Failed to read config from {:?}: {}", path, err);
                return Self::default();
            }
        };

        match ron::from_str(&content) {
            Ok(config) => {
                hub_info!("Loaded config from {:?}", path);
                config
            }
            Err(err) => {
                hub_warn!("Failed to parse config from {:?}: {}", path, err);
                Self::default()
            }
        }
    }

    /// A non-empty token from the environment wins over the file.
    pub fn with_token_override(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|token| !token.trim().is_empty()) {
            self.bearer_token = Some(token);
        }
        self
    }

    pub fn settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            bearer_token: self.bearer_token.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_bytes: self.max_response_bytes,
            ..ClientSettings::default()
        }
    }

    pub fn page_size(&self) -> PageSize {
        page_size_or_default(self.page_size, "page_size")
    }

    pub fn server_page_size(&self) -> PageSize {
        page_size_or_default(self.server_page_size, "server_page_size")
    }

    pub fn policy(&self) -> FailurePolicy {
        match self.on_failure {
            OnFailure::Retry => FailurePolicy::Retry,
            OnFailure::Terminal => FailurePolicy::Terminal,
        }
    }

    pub fn wait(&self) -> Duration {
        Duration::from_secs(self.wait_secs.max(1))
    }
}

pub(crate) fn page_size_or_default(size: usize, field: &str) -> PageSize {
    PageSize::new(size).unwrap_or_else(|| {
        hub_warn!("{} must be at least 1, using {}", field, PageSize::DEFAULT.get());
        PageSize::DEFAULT
    })
}
