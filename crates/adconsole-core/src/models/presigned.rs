use serde::{Deserialize, Serialize};

/// Single time-limited link returned by `GET /assets/{id}/url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresignedUrl {
    pub url: String,
    /// Lifetime reported by the backend (seconds or minutes, backend-defined).
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Input and output links for one asset. Never persisted; refetched whenever
/// the owning asset changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresignedUrls {
    #[serde(rename = "inputURL", alias = "input_url", default)]
    pub input_url: Option<String>,
    #[serde(rename = "outputURL", alias = "output_url", default)]
    pub output_url: Option<String>,
}
