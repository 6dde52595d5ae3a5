//! Human-readable evaluation summary.

use crate::eval::record::AutoScores;

/// Render the fixed Markdown score table for an evaluation run.
pub fn render_markdown(auto: &AutoScores) -> String {
    let mut out = format!(
        r#"
# 📊 Evaluation Summary

**ROUGE Scores**
- ROUGE-1 F1: `{r1:.3}`
- ROUGE-2 F1: `{r2:.3}`
- ROUGE-L F1: `{rl:.3}`

**BLEU Score (Average)**: `{bleu:.3}`
**RAG-US Score (Faithfulness Proxy)**: `{ragus:.3}`
"#,
        r1 = auto.rouge.rouge1.f1,
        r2 = auto.rouge.rouge2.f1,
        rl = auto.rouge.rouge_l.f1,
        bleu = auto.bleu.average,
        ragus = auto.ragus,
    );
    if let Some(semantic) = auto.semantic_similarity {
        out.push_str(&format!("**Semantic Similarity**: `{semantic:.3}`\n"));
    }
    out.push_str(
        "\n---\n\nThis evaluation was automatically generated from the summary and agent raw outputs.\n",
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::record::{BleuScores, RougeScore, RougeScores};

    fn auto(semantic: Option<f64>) -> AutoScores {
        let score = |f1| RougeScore {
            precision: f1,
            recall: f1,
            f1,
        };
        AutoScores {
            rouge: RougeScores {
                rouge1: score(0.51234),
                rouge2: score(0.25),
                rouge_l: score(0.4),
            },
            bleu: BleuScores {
                per_reference: vec![0.1],
                average: 0.1,
            },
            ragus: 0.987654,
            semantic_similarity: semantic,
        }
    }

    #[test]
    fn scores_render_with_three_decimals() {
        let md = render_markdown(&auto(None));
        assert!(md.contains("# 📊 Evaluation Summary"));
        assert!(md.contains("- ROUGE-1 F1: `0.512`"));
        assert!(md.contains("- ROUGE-2 F1: `0.250`"));
        assert!(md.contains("- ROUGE-L F1: `0.400`"));
        assert!(md.contains("**BLEU Score (Average)**: `0.100`"));
        assert!(md.contains("**RAG-US Score (Faithfulness Proxy)**: `0.988`"));
        assert!(!md.contains("Semantic Similarity"));
        assert!(md
            .trim_end()
            .ends_with("automatically generated from the summary and agent raw outputs."));
    }

    #[test]
    fn semantic_row_appears_when_scored() {
        let md = render_markdown(&auto(Some(0.7)));
        assert!(md.contains("**Semantic Similarity**: `0.700`"));
    }
}
