//! Optional news-sentiment capability.
//!
//! The actual feed lives in an external collaborator; the engine only needs
//! a best-effort score in [0, 1] where 0.5 is neutral. Absence of a provider
//! or of a score degrades gracefully to no bonus.

use async_trait::async_trait;

#[async_trait]
pub trait SentimentProvider: Send + Sync {
    /// Sentiment score for the symbol, if one is available right now.
    async fn score_of(&self, symbol: &str) -> Option<f64>;
}

/// Always-neutral provider for deployments without a news feed.
pub struct NeutralSentiment;

#[async_trait]
impl SentimentProvider for NeutralSentiment {
    async fn score_of(&self, _symbol: &str) -> Option<f64> {
        Some(0.5)
    }
}
