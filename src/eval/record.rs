//! Evaluation artifact schema.
//!
//! The JSON record written next to an evaluated summary. Key names are part
//! of the exposed artifact format, so renames here are breaking changes.

use serde::{Deserialize, Serialize};

/// Precision, recall, and their harmonic mean for one overlap variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RougeScore {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RougeScores {
    pub rouge1: RougeScore,
    pub rouge2: RougeScore,
    #[serde(rename = "rougeL")]
    pub rouge_l: RougeScore,
}

/// Smoothed 4-gram scores, one per reference file plus the mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BleuScores {
    pub per_reference: Vec<f64>,
    pub average: f64,
}

/// All automatically computed scores for one summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoScores {
    pub rouge: RougeScores,
    pub bleu: BleuScores,
    pub ragus: f64,
    /// Embedding cosine when a semantic scorer ran; absent otherwise. On
    /// scorer failure this holds the substituted faithfulness proxy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_similarity: Option<f64>,
}

/// The full machine-readable evaluation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub timestamp: String,
    pub summary_file: String,
    pub references_dir: String,
    pub auto: AutoScores,
    #[serde(default)]
    pub meta: serde_json::Map<String, serde_json::Value>,
}
