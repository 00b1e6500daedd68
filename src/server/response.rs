use serde::{Deserialize, Serialize};

/// JSON body returned when a URL was opened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenResponse {
    pub status: String,
    pub message: String,
    pub url: String,
}

impl OpenResponse {
    pub fn success(url: String) -> Self {
        Self {
            status: "success".to_string(),
            message: format!("Opened {}", url),
            url,
        }
    }
}
