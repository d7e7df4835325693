//! Client settings and backend routes

use crate::session::Session;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default settings file name
pub const DEFAULT_SETTINGS_PATH: &str = "butler.json";

/// Client settings
///
/// Persistent configuration for the Butler client, stored as JSON.
///
/// # Example
/// ```rust,no_run
/// use butler::settings::Settings;
///
/// // Load settings (returns default if file doesn't exist)
/// let mut settings = Settings::load("butler.json").expect("Failed to load");
///
/// // Remember who is signed in and auto-save
/// settings
///     .update_identity("u1".to_string(), Some("Alice".to_string()), "butler.json")
///     .expect("Failed to update");
///
/// println!("Backend: {}", settings.api_base_url);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the Butler backend
    pub api_base_url: String,
    /// HTTP request timeout in seconds (0 = transport default)
    pub request_timeout_secs: u64,
    /// Signed-in user id
    pub user_id: Option<String>,
    /// Signed-in user display name
    pub user_name: Option<String>,
    /// Log file used by the terminal front-end
    pub log_path: String,
    /// Refresh interval of the open conversation in seconds (0 = never)
    pub history_poll_secs: u64,
}

impl Settings {
    /// Load settings from a JSON file
    ///
    /// Returns default settings if the file doesn't exist or is empty.
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let data = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read settings: {}", e)))?;

        if data.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_str(&data)
            .map_err(|e| Error::Config(format!("Failed to parse settings: {}", e)))
    }

    /// Save settings to a JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::Config(format!("Failed to create settings directory: {}", e))
                })?;
            }
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(path, json)
            .map_err(|e| Error::Config(format!("Failed to write settings: {}", e)))?;

        Ok(())
    }

    /// Store the signed-in user and auto-save
    pub fn update_identity<P: AsRef<std::path::Path>>(
        &mut self,
        user_id: String,
        user_name: Option<String>,
        save_path: P,
    ) -> Result<()> {
        self.user_id = Some(user_id);
        self.user_name = user_name;
        self.save(save_path)
    }

    /// Session built from the stored identity
    pub fn session(&self) -> Session {
        Session::from_parts(self.user_id.as_deref(), self.user_name.as_deref())
    }

    /// Backend routes derived from `api_base_url`
    pub fn routes(&self) -> ApiRoutes {
        ApiRoutes::from_base(&self.api_base_url)
    }

    /// Request timeout, if one is configured
    pub fn request_timeout(&self) -> Option<std::time::Duration> {
        (self.request_timeout_secs > 0)
            .then(|| std::time::Duration::from_secs(self.request_timeout_secs))
    }

    /// History refresh interval, if enabled
    pub fn history_poll_interval(&self) -> Option<std::time::Duration> {
        (self.history_poll_secs > 0).then(|| std::time::Duration::from_secs(self.history_poll_secs))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            request_timeout_secs: 30,
            user_id: None,
            user_name: None,
            log_path: "./butler.log".to_string(),
            history_poll_secs: 0,
        }
    }
}

/// Absolute URLs of every backend endpoint the client calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRoutes {
    /// GET conversation list / POST new conversation
    pub chats: String,
    /// GET history / POST send / PUT edit; DELETE takes the id as an
    /// extra path segment
    pub messages: String,
    /// GET summary list / POST new summary
    pub summaries: String,
    /// GET most recent summaries
    pub recent_summaries: String,
    /// GET one summary
    pub summary: String,
}

impl ApiRoutes {
    /// Derive every route from a base URL
    pub fn from_base(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            chats: format!("{}/api/chats", base),
            messages: format!("{}/api/messages", base),
            summaries: format!("{}/api/summaries", base),
            recent_summaries: format!("{}/api/summaries/recent", base),
            summary: format!("{}/api/summary", base),
        }
    }
}
