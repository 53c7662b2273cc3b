use serde::{Deserialize, Serialize};

use crate::{domain::WordFrequency, error::ApiError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    #[serde(default)]
    pub frequencies: Vec<WordFrequency>,
    #[serde(default)]
    pub wordcloud_image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl GenerateResponse {
    pub fn ok(frequencies: Vec<WordFrequency>, wordcloud_image: String) -> Self {
        Self {
            success: true,
            frequencies,
            wordcloud_image,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopwordRequest {
    pub word: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

impl From<ApiError> for StatusResponse {
    fn from(value: ApiError) -> Self {
        Self::failed(value.message)
    }
}

impl From<ApiError> for GenerateResponse {
    fn from(value: ApiError) -> Self {
        Self::failed(value.message)
    }
}
