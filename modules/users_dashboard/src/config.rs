use serde::{Deserialize, Serialize};

/// Configuration for the users_dashboard module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UsersDashboardConfig {
    /// Collection URL of the remote user service
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Ids at or above this value are treated as locally synthesized
    #[serde(default = "default_local_id_threshold")]
    pub local_id_threshold: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for UsersDashboardConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            page_size: default_page_size(),
            local_id_threshold: default_local_id_threshold(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_api_url() -> String {
    "https://jsonplaceholder.typicode.com/users".to_string()
}

fn default_page_size() -> usize {
    crate::domain::view::DEFAULT_PAGE_SIZE
}

fn default_local_id_threshold() -> u64 {
    crate::domain::ids::DEFAULT_LOCAL_ID_THRESHOLD
}

fn default_request_timeout_secs() -> u64 {
    30
}
