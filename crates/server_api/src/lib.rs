use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use shared::{
    domain::WordFrequency,
    error::{ApiError, ErrorCode},
};
use tokio::sync::RwLock;
use tracing::{info, warn};

pub mod analysis;
pub mod layout;
pub mod render;
pub mod stopwords;

use analysis::Analyzer;
use render::CloudRenderer;
use stopwords::StopwordSet;

/// Number of ranked pairs returned to the client.
pub const TOP_WORDS: usize = 10;

#[derive(Clone)]
pub struct ApiContext {
    pub analyzer: Arc<Analyzer>,
    pub renderer: Arc<dyn CloudRenderer>,
    pub stopwords: Arc<RwLock<StopwordSet>>,
    /// PNG bytes of the most recent successful generation.
    pub current_cloud: Arc<RwLock<Option<Vec<u8>>>>,
}

impl ApiContext {
    pub fn new(analyzer: Arc<Analyzer>, renderer: Arc<dyn CloudRenderer>) -> Self {
        Self {
            analyzer,
            renderer,
            stopwords: Arc::new(RwLock::new(StopwordSet::new())),
            current_cloud: Arc::new(RwLock::new(None)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedCloud {
    pub frequencies: Vec<WordFrequency>,
    /// `data:image/png;base64,...`
    pub image_data_url: String,
}

pub async fn generate(ctx: &ApiContext, text: &str) -> Result<GeneratedCloud, ApiError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ApiError::validation("Please enter some text"));
    }

    let stopwords = ctx.stopwords.read().await.clone();
    let analyzer = Arc::clone(&ctx.analyzer);
    let renderer = Arc::clone(&ctx.renderer);
    let owned_text = text.to_string();

    let (frequencies, png) = tokio::task::spawn_blocking(move || {
        let frequencies = analyzer.frequencies(&owned_text, &stopwords);
        let png = renderer.render(&frequencies);
        (frequencies, png)
    })
    .await
    .map_err(|e| ApiError::internal(format!("word cloud task failed: {e}")))?;
    let png = png.map_err(|e| ApiError::internal(e.to_string()))?;

    let image_data_url = format!("data:image/png;base64,{}", STANDARD.encode(&png));
    *ctx.current_cloud.write().await = Some(png);

    info!(
        distinct_words = frequencies.len(),
        chars = text.chars().count(),
        "generated word cloud"
    );
    Ok(GeneratedCloud {
        frequencies: frequencies.into_iter().take(TOP_WORDS).collect(),
        image_data_url,
    })
}

pub async fn add_stopword(ctx: &ApiContext, word: &str) -> Result<(), ApiError> {
    let word = word.trim();
    if word.is_empty() {
        return Err(ApiError::validation("Please enter a stopword to add"));
    }

    let mut stopwords = ctx.stopwords.write().await;
    if !stopwords.insert(word) {
        warn!(word, "stopword already present");
        return Err(ApiError::new(ErrorCode::Conflict, "Stopword already exists"));
    }
    info!(word, total = stopwords.len(), "stopword added");
    Ok(())
}

pub async fn remove_stopword(ctx: &ApiContext, word: &str) -> Result<(), ApiError> {
    let word = word.trim();
    if word.is_empty() {
        return Err(ApiError::validation("Please choose a stopword to remove"));
    }

    let mut stopwords = ctx.stopwords.write().await;
    if !stopwords.remove(word) {
        return Err(ApiError::new(ErrorCode::NotFound, "Stopword is not in the list"));
    }
    info!(word, total = stopwords.len(), "stopword removed");
    Ok(())
}

pub async fn current_image(ctx: &ApiContext) -> Result<Vec<u8>, ApiError> {
    ctx.current_cloud
        .read()
        .await
        .clone()
        .ok_or_else(|| ApiError::new(ErrorCode::NotFound, "Generate a word cloud first"))
}
