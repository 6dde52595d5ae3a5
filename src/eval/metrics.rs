//! Deterministic text-similarity metrics.
//!
//! Everything here is a pure function of its text inputs: n-gram overlap
//! scores, smoothed 4-gram precision, a fuzzy-alignment faithfulness proxy,
//! and vector cosine. Determinism is what makes evaluation runs
//! reproducible, so none of these functions touch clocks, randomness, or
//! the filesystem.

use std::collections::HashMap;

use crate::eval::record::{BleuScores, RougeScore, RougeScores};

const BLEU_MAX_ORDER: usize = 4;
const BLEU_WEIGHT: f64 = 0.25;
const WINKLER_PREFIX_SCALE: f64 = 0.1;
const WINKLER_MAX_PREFIX: usize = 4;

/// Lowercase a text and split it into alphanumeric word tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn ngram_counts<'a>(tokens: &'a [String], n: usize) -> HashMap<&'a [String], usize> {
    let mut counts = HashMap::new();
    if n == 0 || tokens.len() < n {
        return counts;
    }
    for gram in tokens.windows(n) {
        *counts.entry(gram).or_insert(0) += 1;
    }
    counts
}

/// Candidate n-gram count clipped by the reference count, summed.
fn clipped_overlap(
    candidate: &HashMap<&[String], usize>,
    reference: &HashMap<&[String], usize>,
) -> usize {
    candidate
        .iter()
        .map(|(gram, count)| (*count).min(reference.get(gram).copied().unwrap_or(0)))
        .sum()
}

fn f_score(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

fn rouge_n(candidate: &[String], reference: &[String], n: usize) -> RougeScore {
    let cand = ngram_counts(candidate, n);
    let refc = ngram_counts(reference, n);
    let cand_total: usize = cand.values().sum();
    let ref_total: usize = refc.values().sum();
    let overlap = clipped_overlap(&cand, &refc);
    let precision = if cand_total == 0 {
        0.0
    } else {
        overlap as f64 / cand_total as f64
    };
    let recall = if ref_total == 0 {
        0.0
    } else {
        overlap as f64 / ref_total as f64
    };
    RougeScore {
        precision,
        recall,
        f1: f_score(precision, recall),
    }
}

fn lcs_length(a: &[String], b: &[String]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for ai in a {
        for (j, bj) in b.iter().enumerate() {
            curr[j + 1] = if ai == bj {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn rouge_l(candidate: &[String], reference: &[String]) -> RougeScore {
    let lcs = lcs_length(candidate, reference) as f64;
    let precision = if candidate.is_empty() {
        0.0
    } else {
        lcs / candidate.len() as f64
    };
    let recall = if reference.is_empty() {
        0.0
    } else {
        lcs / reference.len() as f64
    };
    RougeScore {
        precision,
        recall,
        f1: f_score(precision, recall),
    }
}

/// Unigram, bigram, and longest-common-subsequence overlap between a
/// candidate and the concatenated reference corpus.
pub fn rouge(summary: &str, references: &str) -> RougeScores {
    let candidate = tokenize(summary);
    let reference = tokenize(references);
    RougeScores {
        rouge1: rouge_n(&candidate, &reference, 1),
        rouge2: rouge_n(&candidate, &reference, 2),
        rouge_l: rouge_l(&candidate, &reference),
    }
}

/// Clipped n-gram matches over total candidate n-grams.
fn modified_precision(candidate: &[String], reference: &[String], n: usize) -> (usize, usize) {
    let cand = ngram_counts(candidate, n);
    let refc = ngram_counts(reference, n);
    let numerator = clipped_overlap(&cand, &refc);
    let denominator = cand.values().sum();
    (numerator, denominator)
}

/// 4-gram modified precision against a single reference, with geometric
/// smoothing: the k-th zero numerator is replaced by 1/(2^k * denominator)
/// so short candidates never collapse to a hard zero.
fn sentence_bleu(candidate: &[String], reference: &[String]) -> f64 {
    if candidate.is_empty() || reference.is_empty() {
        return 0.0;
    }

    let mut log_sum = 0.0;
    let mut zeros_seen: i32 = 1;
    for n in 1..=BLEU_MAX_ORDER {
        let (numerator, denominator) = modified_precision(candidate, reference, n);
        let denominator = denominator.max(1) as f64;
        let precision = if numerator == 0 {
            let smoothed = 1.0 / (2.0_f64.powi(zeros_seen) * denominator);
            zeros_seen += 1;
            smoothed
        } else {
            numerator as f64 / denominator
        };
        log_sum += BLEU_WEIGHT * precision.ln();
    }

    let brevity = if candidate.len() > reference.len() {
        1.0
    } else {
        (1.0 - reference.len() as f64 / candidate.len() as f64).exp()
    };
    brevity * log_sum.exp()
}

/// Smoothed 4-gram score per reference, plus their average.
pub fn bleu(summary: &str, references: &[String]) -> BleuScores {
    let candidate = tokenize(summary);
    let per_reference: Vec<f64> = references
        .iter()
        .map(|reference| sentence_bleu(&candidate, &tokenize(reference)))
        .collect();
    let average = if per_reference.is_empty() {
        0.0
    } else {
        per_reference.iter().sum::<f64>() / per_reference.len() as f64
    };
    BleuScores {
        per_reference,
        average,
    }
}

/// Split a text into sentences.
///
/// A sentence ends at a newline, or at `.`, `!`, `?` followed by
/// whitespace. Decimal points survive, and Markdown headings count as
/// sentences of their own.
pub fn sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\n' {
            flush_sentence(&mut out, &mut current);
            continue;
        }
        current.push(c);
        if matches!(c, '.' | '!' | '?') {
            match chars.peek() {
                Some(next) if !next.is_whitespace() => {}
                _ => flush_sentence(&mut out, &mut current),
            }
        }
    }
    flush_sentence(&mut out, &mut current);
    out
}

fn flush_sentence(out: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
    current.clear();
}

/// Faithfulness proxy: average, over candidate sentences, of the best
/// fuzzy similarity between that sentence and any single reference.
pub fn ragus(summary: &str, references: &[String]) -> f64 {
    if references.is_empty() {
        return 0.0;
    }
    let references: Vec<String> = references.iter().map(|r| r.to_lowercase()).collect();
    let candidate_sentences = sentences(summary);
    if candidate_sentences.is_empty() {
        return 0.0;
    }

    let total: f64 = candidate_sentences
        .iter()
        .map(|sentence| {
            let sentence = sentence.to_lowercase();
            references
                .iter()
                .map(|reference| jaro_winkler(&sentence, reference))
                .fold(0.0, f64::max)
        })
        .sum();
    total / candidate_sentences.len() as f64
}

fn jaro(a: &[char], b: &[char]) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let window = (a.len().max(b.len()) / 2).saturating_sub(1);
    let mut a_matched = vec![false; a.len()];
    let mut b_matched = vec![false; b.len()];
    let mut matches = 0usize;
    for (i, ca) in a.iter().enumerate() {
        let lo = i.saturating_sub(window);
        let hi = (i + window + 1).min(b.len());
        for (j, matched) in b_matched.iter_mut().enumerate().take(hi).skip(lo) {
            if !*matched && b[j] == *ca {
                a_matched[i] = true;
                *matched = true;
                matches += 1;
                break;
            }
        }
    }
    if matches == 0 {
        return 0.0;
    }

    let mut transposed = 0usize;
    let mut j = 0usize;
    for (i, matched) in a_matched.iter().enumerate() {
        if !matched {
            continue;
        }
        while !b_matched[j] {
            j += 1;
        }
        if a[i] != b[j] {
            transposed += 1;
        }
        j += 1;
    }

    let m = matches as f64;
    let t = (transposed / 2) as f64;
    (m / a.len() as f64 + m / b.len() as f64 + (m - t) / m) / 3.0
}

/// Jaro similarity boosted for a shared prefix of up to four characters.
pub fn jaro_winkler(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let sim = jaro(&a, &b);
    let prefix = a
        .iter()
        .zip(b.iter())
        .take(WINKLER_MAX_PREFIX)
        .take_while(|(x, y)| x == y)
        .count();
    sim + prefix as f64 * WINKLER_PREFIX_SCALE * (1.0 - sim)
}

/// Cosine similarity between two equal-length vectors.
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn tokenize_lowercases_and_drops_punctuation() {
        assert_eq!(tokenize("Hello, World! 42"), ["hello", "world", "42"]);
        assert!(tokenize("--- ***").is_empty());
    }

    #[test]
    fn identical_texts_score_perfect_rouge() {
        let scores = rouge("The Eiffel Tower at dusk", "the eiffel tower at dusk");
        assert!(close(scores.rouge1.f1, 1.0));
        assert!(close(scores.rouge2.f1, 1.0));
        assert!(close(scores.rouge_l.f1, 1.0));
    }

    #[test]
    fn disjoint_texts_score_zero_rouge() {
        let scores = rouge("alpha beta", "gamma delta");
        assert!(close(scores.rouge1.f1, 0.0));
        assert!(close(scores.rouge2.f1, 0.0));
        assert!(close(scores.rouge_l.f1, 0.0));
    }

    #[test]
    fn rouge_precision_and_recall_use_their_own_denominators() {
        let scores = rouge("the cat sat", "the cat ran home");
        assert!(close(scores.rouge1.precision, 2.0 / 3.0));
        assert!(close(scores.rouge1.recall, 0.5));
        assert!(close(scores.rouge2.precision, 0.5));
        assert!(close(scores.rouge2.recall, 1.0 / 3.0));
        assert!(close(scores.rouge2.f1, 0.4));
        assert!(close(scores.rouge_l.precision, 2.0 / 3.0));
        assert!(close(scores.rouge_l.recall, 0.5));
    }

    #[test]
    fn repeated_candidate_ngrams_are_clipped() {
        let scores = rouge("paris paris paris", "paris in spring");
        assert!(close(scores.rouge1.precision, 1.0 / 3.0));
        assert!(close(scores.rouge1.recall, 1.0 / 3.0));
    }

    #[test]
    fn lcs_respects_order() {
        let a = tokenize("a b c d");
        let b = tokenize("a c b d");
        assert_eq!(lcs_length(&a, &b), 3);
    }

    #[test]
    fn bleu_is_one_for_an_exact_match() {
        let text = "pack an umbrella for the rainy season";
        let scores = bleu(text, &[text.to_string()]);
        assert_eq!(scores.per_reference.len(), 1);
        assert!(close(scores.per_reference[0], 1.0));
        assert!(close(scores.average, 1.0));
    }

    #[test]
    fn bleu_handles_empty_inputs() {
        assert!(close(bleu("", &["some reference".to_string()]).average, 0.0));
        assert!(close(bleu("some summary", &[]).average, 0.0));
    }

    #[test]
    fn smoothing_keeps_short_candidates_above_zero() {
        // Two tokens leave no 3- or 4-grams, which would zero the score
        // without smoothing.
        let scores = bleu("the cat", &["the cat sat on the mat".to_string()]);
        let expected = 0.125_f64.powf(0.25) * (1.0_f64 - 3.0).exp();
        assert!(scores.per_reference[0] > 0.0);
        assert!((scores.per_reference[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn bleu_averages_across_references() {
        let text = "pack an umbrella for the rainy season";
        let scores = bleu(text, &[text.to_string(), "entirely different words here".to_string()]);
        assert_eq!(scores.per_reference.len(), 2);
        assert!(scores.per_reference[0] > scores.per_reference[1]);
        let mean = (scores.per_reference[0] + scores.per_reference[1]) / 2.0;
        assert!(close(scores.average, mean));
    }

    #[test]
    fn sentences_split_on_terminators_and_newlines() {
        let text = "First one. Second sentence! A third? Yes\n# Heading\nlast";
        let split = sentences(text);
        assert_eq!(
            split,
            ["First one.", "Second sentence!", "A third?", "Yes", "# Heading", "last"]
        );
    }

    #[test]
    fn sentences_keep_decimal_points_intact() {
        assert_eq!(sentences("Version 3.5 shipped."), ["Version 3.5 shipped."]);
    }

    #[test]
    fn jaro_winkler_matches_reference_values() {
        assert!(close(jaro_winkler("martha", "marhta"), 173.0 / 180.0));
        assert!(close(jaro_winkler("same", "same"), 1.0));
        assert!(close(jaro_winkler("abc", "xyz"), 0.0));
        assert!(close(jaro_winkler("", ""), 1.0));
    }

    #[test]
    fn ragus_is_perfect_for_verbatim_sentences() {
        let score = ragus("Paris is lovely in June.", &["paris is lovely in june.".to_string()]);
        assert!(close(score, 1.0));
    }

    #[test]
    fn ragus_takes_the_best_reference_per_sentence() {
        let refs = vec![
            "completely unrelated text".to_string(),
            "the louvre closes on tuesdays".to_string(),
        ];
        let single = ragus("The Louvre closes on Tuesdays.", &refs);
        let against_worst = jaro_winkler(
            "the louvre closes on tuesdays.",
            "completely unrelated text",
        );
        assert!(single > against_worst);
    }

    #[test]
    fn ragus_degrades_to_zero_without_input() {
        assert!(close(ragus("", &["ref".to_string()]), 0.0));
        assert!(close(ragus("summary", &[]), 0.0));
    }

    #[test]
    fn cosine_basics() {
        assert!(close(cosine(&[1.0, 0.0], &[0.0, 1.0]), 0.0));
        assert!(close(cosine(&[1.0, 2.0], &[2.0, 4.0]), 1.0));
        assert!(close(cosine(&[0.0, 0.0], &[1.0, 1.0]), 0.0));
        assert!(close(cosine(&[1.0], &[1.0, 1.0]), 0.0));
    }
}
