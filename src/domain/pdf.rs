use serde::{Deserialize, Serialize};

/// Temporary download link for a ticket PDF.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PdfLink {
    pub url: String,
    #[serde(rename = "expiresIn", default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<String>,
}

/// Raw PDF bytes downloaded from the API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PdfDocument {
    pub content: Vec<u8>,
}

/// Object storage status reported by the API.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageInfo {
    #[serde(rename = "bucketName", default)]
    pub bucket_name: String,
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub connected: bool,
}

/// Confirmation returned when a stored PDF is deleted.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PdfRemoval {
    #[serde(default)]
    pub message: Option<String>,
}
