use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::str::FromStr;

use crate::services::store::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub media_id: u64,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub post_id: u64,
    pub uploader_id: u64,
    pub filename: String,
    /// Public path of the stored file.
    pub url: String,
    pub size: usize,
    pub created_at: DateTime<Utc>,
}

impl Record for Media {
    fn id(&self) -> u64 {
        self.media_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl FromStr for MediaType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "image" => Ok(MediaType::Image),
            "video" => Ok(MediaType::Video),
            _ => Err(()),
        }
    }
}

/// Parsed multipart form of `POST /media`. Fields stay raw until validated.
#[derive(Debug, Default)]
pub struct MediaUpload {
    pub media_type: Option<String>,
    pub post_id: Option<String>,
    pub filename: Option<String>,
    pub data: Option<Vec<u8>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MediaUploadResponse {
    pub media_id: u64,
    pub message: String,
}
