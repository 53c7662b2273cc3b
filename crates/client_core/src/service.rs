use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::{
        WordFrequency, ADD_STOPWORD_ROUTE, GENERATE_ROUTE, REMOVE_STOPWORD_ROUTE,
        SAVE_IMAGE_ROUTE,
    },
    protocol::{GenerateRequest, GenerateResponse, StatusResponse, StopwordRequest},
};
use tracing::debug;
use url::Url;

use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCloud {
    pub frequencies: Vec<WordFrequency>,
    pub image: String,
}

/// The backend that segments text, tracks stopwords and renders clouds.
#[async_trait]
pub trait WordCloudService: Send + Sync {
    async fn generate(&self, text: &str) -> Result<GeneratedCloud, ClientError>;
    async fn add_stopword(&self, word: &str) -> Result<(), ClientError>;
    async fn remove_stopword(&self, word: &str) -> Result<(), ClientError>;
    /// PNG bytes of the most recently generated cloud.
    async fn save_image(&self) -> Result<Vec<u8>, ClientError>;
}

#[async_trait]
impl<T> WordCloudService for Arc<T>
where
    T: WordCloudService + ?Sized,
{
    async fn generate(&self, text: &str) -> Result<GeneratedCloud, ClientError> {
        (**self).generate(text).await
    }

    async fn add_stopword(&self, word: &str) -> Result<(), ClientError> {
        (**self).add_stopword(word).await
    }

    async fn remove_stopword(&self, word: &str) -> Result<(), ClientError> {
        (**self).remove_stopword(word).await
    }

    async fn save_image(&self) -> Result<Vec<u8>, ClientError> {
        (**self).save_image().await
    }
}

pub struct HttpWordCloudService {
    http: Client,
    server_url: String,
}

impl HttpWordCloudService {
    pub fn new(server_url: impl Into<String>) -> Result<Self, ClientError> {
        let server_url = server_url.into();
        let parsed = Url::parse(&server_url).map_err(|e| ClientError::InvalidServerUrl {
            url: server_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidServerUrl {
                url: server_url,
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        Ok(Self {
            http: Client::new(),
            server_url: server_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    async fn post_json<B, R>(&self, route: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let res = self
            .http
            .post(format!("{}{route}", self.server_url))
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        let decoded = res.json::<R>().await.map_err(|e| {
            ClientError::Transport(format!("undecodable response from {route}: {e}"))
        })?;
        debug!(route, "service responded");
        Ok(decoded)
    }
}

fn status_into_result(status: StatusResponse) -> Result<(), ClientError> {
    if status.success {
        Ok(())
    } else {
        Err(ClientError::Service {
            message: status.message,
        })
    }
}

#[async_trait]
impl WordCloudService for HttpWordCloudService {
    async fn generate(&self, text: &str) -> Result<GeneratedCloud, ClientError> {
        let body: GenerateResponse = self
            .post_json(
                GENERATE_ROUTE,
                &GenerateRequest {
                    text: text.to_string(),
                },
            )
            .await?;
        if !body.success {
            return Err(ClientError::Service {
                message: body.message,
            });
        }
        Ok(GeneratedCloud {
            frequencies: body.frequencies,
            image: body.wordcloud_image,
        })
    }

    async fn add_stopword(&self, word: &str) -> Result<(), ClientError> {
        let status: StatusResponse = self
            .post_json(
                ADD_STOPWORD_ROUTE,
                &StopwordRequest {
                    word: word.to_string(),
                },
            )
            .await?;
        status_into_result(status)
    }

    async fn remove_stopword(&self, word: &str) -> Result<(), ClientError> {
        let status: StatusResponse = self
            .post_json(
                REMOVE_STOPWORD_ROUTE,
                &StopwordRequest {
                    word: word.to_string(),
                },
            )
            .await?;
        status_into_result(status)
    }

    async fn save_image(&self) -> Result<Vec<u8>, ClientError> {
        let res = self
            .http
            .get(format!("{}{SAVE_IMAGE_ROUTE}", self.server_url))
            .send()
            .await?
            .error_for_status()?;
        let bytes = res.bytes().await?;
        Ok(bytes.to_vec())
    }
}
