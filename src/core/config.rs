use std::collections::HashSet;
use std::env;

pub const DEFAULT_MODEL_NAME: &str = "gemini-2.5-flash";
pub const DEFAULT_LOCATION: &str = "us-central1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_SLACK_API_BASE: &str = "https://slack.com/api";

/// Process-wide settings, loaded once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub slack_bot_token: String,
    pub slack_signing_secret: String,
    pub google_project: String,
    pub google_location: String,
    pub model_name: String,
    /// Empty means every workspace is accepted.
    pub allowed_team_ids: HashSet<String>,
    pub port: u16,
    pub slack_api_base: String,
    pub vertex_api_base: String,
    pub google_access_token: Option<String>,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns `VAR: reason` when a required variable is missing or malformed.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `VAR: reason` when a required variable is missing or malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required =
            |key: &str| non_empty(key).ok_or_else(|| format!("{key}: environment variable not set"));

        let google_location =
            non_empty("GOOGLE_LOCATION").unwrap_or_else(|| DEFAULT_LOCATION.to_string());

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| format!("PORT: {e}"))?,
            None => DEFAULT_PORT,
        };

        let allowed_team_ids = non_empty("SLACK_ALLOWED_TEAM_IDS")
            .map(|raw| parse_team_ids(&raw))
            .unwrap_or_default();

        let vertex_api_base = non_empty("VERTEX_API_BASE")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| default_vertex_api_base(&google_location));

        Ok(Self {
            slack_bot_token: required("SLACK_BOT_TOKEN")?,
            slack_signing_secret: required("SLACK_SIGNING_SECRET")?,
            google_project: non_empty("GOOGLE_PROJECT")
                .or_else(|| non_empty("GOOGLE_CLOUD_PROJECT"))
                .ok_or_else(|| "GOOGLE_PROJECT: environment variable not set".to_string())?,
            google_location,
            model_name: non_empty("MODEL_NAME").unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string()),
            allowed_team_ids,
            port,
            slack_api_base: non_empty("SLACK_API_BASE")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_SLACK_API_BASE.to_string()),
            vertex_api_base,
            google_access_token: non_empty("GOOGLE_ACCESS_TOKEN"),
        })
    }

    /// Whether requests from `team_id` may be processed.
    #[must_use]
    pub fn is_team_allowed(&self, team_id: &str) -> bool {
        self.allowed_team_ids.is_empty() || self.allowed_team_ids.contains(team_id)
    }
}

fn parse_team_ids(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Vertex AI serves the `global` location from the unprefixed host.
#[must_use]
pub fn default_vertex_api_base(location: &str) -> String {
    if location == "global" {
        "https://aiplatform.googleapis.com".to_string()
    } else {
        format!("https://{location}-aiplatform.googleapis.com")
    }
}
