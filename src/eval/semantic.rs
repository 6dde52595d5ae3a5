//! Optional embedding-based similarity.
//!
//! Semantic scoring is strictly best-effort: the runner substitutes the
//! faithfulness proxy whenever a scorer errors, so implementations are free
//! to fail on missing keys, network trouble, or runtime nesting.

use crate::eval::metrics::cosine;
use crate::llm::{GeminiEmbedding, LlmError};

/// Scores how close a candidate text is to a reference corpus.
pub trait SemanticScorer: std::fmt::Debug {
    /// Similarity in `[0, 1]`-ish cosine space.
    fn score(&self, candidate: &str, reference: &str) -> Result<f64, LlmError>;
}

impl SemanticScorer for GeminiEmbedding {
    fn score(&self, candidate: &str, reference: &str) -> Result<f64, LlmError> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(LlmError::NestedRuntime);
        }
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(async {
            let candidate = self.embed(candidate).await?;
            let reference = self.embed(reference).await?;
            Ok(cosine(&candidate, &reference))
        })
    }
}
