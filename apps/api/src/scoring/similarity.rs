//! Weighted label similarity — the deterministic scoring path.
//!
//! Candidate labels are fuzzy-matched against the job's labels, every label
//! in the union gets a weight (experience fulfillment capped at 1.0,
//! priority labels doubled, everything else 1.0), and the score is the
//! cosine similarity of the resulting job/candidate weight vectors.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;
use strsim::jaro_winkler;

use crate::scoring::embedding::{cosine_f32, Embedder};

/// Minimum fuzzy-match score (0–100) for a candidate label to count as
/// covering a job label.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 80.0;

const EXPERIENCE_KEYWORDS: &[&str] = &["year", "yr", "experience", "exp"];

#[derive(Debug, Clone, Serialize)]
pub struct SimilarityOutcome {
    /// Cosine similarity in [0, 1], rounded to 3 decimals.
    pub score: f64,
    /// Job labels covered by some candidate label.
    pub matched: Vec<String>,
    /// Job labels no candidate label covered.
    pub missing: Vec<String>,
}

/// Scores a candidate label set against a job label set.
pub fn compute_weighted_similarity(
    jd_labels: &[String],
    candidate_labels: &[String],
    priority_labels: &[String],
    fuzzy_threshold: f64,
) -> SimilarityOutcome {
    let mut outcome = weighted_similarity_raw(jd_labels, candidate_labels, priority_labels, fuzzy_threshold);
    outcome.score = round3(outcome.score);
    outcome
}

/// Same as [`compute_weighted_similarity`], averaged 50/50 with the cosine
/// similarity of sentence embeddings of the two label sets. Falls back to
/// the lexical score alone when the embedding service is unavailable.
pub async fn compute_blended_similarity(
    jd_labels: &[String],
    candidate_labels: &[String],
    priority_labels: &[String],
    fuzzy_threshold: f64,
    embedder: &dyn Embedder,
) -> SimilarityOutcome {
    let mut outcome = weighted_similarity_raw(jd_labels, candidate_labels, priority_labels, fuzzy_threshold);

    match semantic_similarity(embedder, jd_labels, candidate_labels).await {
        // Embedding cosine can be negative; the blend stays on the [0, 1] scale.
        Ok(semantic) => outcome.score = ((outcome.score + semantic) / 2.0).clamp(0.0, 1.0),
        Err(e) => tracing::warn!("semantic blend unavailable, keeping lexical score: {e}"),
    }

    outcome.score = round3(outcome.score);
    outcome
}

fn weighted_similarity_raw(
    jd_labels: &[String],
    candidate_labels: &[String],
    priority_labels: &[String],
    fuzzy_threshold: f64,
) -> SimilarityOutcome {
    let jd: Vec<String> = jd_labels.iter().map(|l| l.to_lowercase()).collect();
    let candidate: Vec<String> = candidate_labels.iter().map(|l| l.to_lowercase()).collect();

    let matched = fuzzy_match_labels(&jd, &candidate, fuzzy_threshold);

    // Union of both sets; jd-first order keeps the vectors deterministic.
    let mut all = jd.clone();
    for label in &candidate {
        if !all.contains(label) {
            all.push(label.clone());
        }
    }

    let weights = label_weights(&all, priority_labels, &jd);

    let jd_vec: Vec<f64> = all
        .iter()
        .map(|l| if jd.contains(l) { weights[l] } else { 0.0 })
        .collect();
    let candidate_vec: Vec<f64> = all
        .iter()
        .map(|l| if matched.contains(l) { weights[l] } else { 0.0 })
        .collect();

    let score = cosine(&jd_vec, &candidate_vec);
    let missing = jd
        .iter()
        .filter(|l| !matched.contains(*l))
        .cloned()
        .collect();

    SimilarityOutcome {
        score,
        matched,
        missing,
    }
}

/// For every candidate label, the best-scoring job label is accepted as a
/// match when its fuzzy score clears the threshold. Returns the covered job
/// labels; candidate labels with no acceptable match are simply not covered.
fn fuzzy_match_labels(source: &[String], target: &[String], threshold: f64) -> Vec<String> {
    let mut matched: Vec<String> = Vec::new();
    for label in target {
        let best = source
            .iter()
            .map(|s| (s, jaro_winkler(label, s) * 100.0))
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        if let Some((source_label, score)) = best {
            if score >= threshold && !matched.contains(source_label) {
                matched.push(source_label.clone());
            }
        }
    }
    matched
}

/// Weight of every label in the union:
/// - experience labels: fulfillment relative to the job's requirement,
///   capped at 1.0 — over-qualification is never rewarded past full marks;
/// - priority labels: 2.0;
/// - everything else: 1.0.
fn label_weights(
    labels: &[String],
    priority_labels: &[String],
    jd_labels: &[String],
) -> HashMap<String, f64> {
    // First experience-labeled entry in the job list defines the requirement.
    let jd_exp = jd_labels
        .iter()
        .map(|l| normalize_experience(l))
        .find(|e| *e > 0.0)
        .unwrap_or(0.0);

    let mut weights = HashMap::new();
    for label in labels {
        let exp = normalize_experience(label);
        let weight = if exp > 0.0 && jd_exp > 0.0 {
            (exp / jd_exp).min(1.0)
        } else if priority_labels.iter().any(|p| p.eq_ignore_ascii_case(label)) {
            2.0
        } else {
            1.0
        };
        weights.insert(label.clone(), weight);
    }
    weights
}

/// Extracts the numeric value from labels like "2 years" or "3+ yr exp".
fn normalize_experience(label: &str) -> f64 {
    let label = label.to_lowercase();
    if !EXPERIENCE_KEYWORDS.iter().any(|kw| label.contains(kw)) {
        return 0.0;
    }
    leading_number(&label).unwrap_or(0.0)
}

fn leading_number(text: &str) -> Option<f64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let rest = &text[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(rest.len());
    rest[..end].trim_end_matches('.').parse().ok()
}

/// Cosine similarity; 0.0 when either vector is all-zero.
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

async fn semantic_similarity(
    embedder: &dyn Embedder,
    jd_labels: &[String],
    candidate_labels: &[String],
) -> Result<f64, crate::scoring::embedding::EmbedError> {
    let jd_embedding = embedder.embed(&jd_labels.join(" ")).await?;
    let candidate_embedding = embedder.embed(&candidate_labels.join(" ")).await?;
    Ok(cosine_f32(&jd_embedding, &candidate_embedding))
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_identical_label_sets_score_one() {
        let jd = labels(&["python", "django", "5 year"]);
        let outcome = compute_weighted_similarity(&jd, &jd, &[], DEFAULT_FUZZY_THRESHOLD);
        assert!((outcome.score - 1.0).abs() < 1e-9, "score was {}", outcome.score);
        assert!(outcome.missing.is_empty());
    }

    #[test]
    fn test_empty_candidate_scores_zero() {
        let jd = labels(&["python", "docker"]);
        let outcome = compute_weighted_similarity(&jd, &[], &[], DEFAULT_FUZZY_THRESHOLD);
        assert_eq!(outcome.score, 0.0);
        assert_eq!(outcome.missing, jd);
    }

    #[test]
    fn test_score_is_bounded() {
        let jd = labels(&["python", "rust", "kafka", "5 year"]);
        let candidate = labels(&["python", "kafka", "terraform", "10 year"]);
        let outcome = compute_weighted_similarity(&jd, &candidate, &[], DEFAULT_FUZZY_THRESHOLD);
        assert!((0.0..=1.0).contains(&outcome.score), "score was {}", outcome.score);
    }

    #[test]
    fn test_partial_overlap_is_cosine_of_unit_vectors() {
        let jd = labels(&["python", "rust"]);
        let candidate = labels(&["python"]);
        let outcome = compute_weighted_similarity(&jd, &candidate, &[], DEFAULT_FUZZY_THRESHOLD);
        // jd = [1, 1], candidate = [1, 0] → 1/√2 ≈ 0.707
        assert!((outcome.score - 0.707).abs() < 1e-9, "score was {}", outcome.score);
        assert_eq!(outcome.matched, labels(&["python"]));
        assert_eq!(outcome.missing, labels(&["rust"]));
    }

    #[test]
    fn test_priority_labels_weigh_double() {
        let jd = labels(&["python", "django"]);
        let candidate = labels(&["python"]);
        let priority = labels(&["python"]);
        let outcome = compute_weighted_similarity(&jd, &candidate, &priority, DEFAULT_FUZZY_THRESHOLD);
        // jd = [2, 1], candidate = [2, 0] → 4 / (√5 · 2) ≈ 0.894
        assert!((outcome.score - 0.894).abs() < 1e-9, "score was {}", outcome.score);
    }

    #[test]
    fn test_exact_experience_fulfillment_weighs_one() {
        let weights = label_weights(&labels(&["5 year", "python"]), &[], &labels(&["5 year", "python"]));
        assert_eq!(weights["5 year"], 1.0);
    }

    #[test]
    fn test_overqualification_is_capped_at_one() {
        let all = labels(&["5 year", "10 year"]);
        let weights = label_weights(&all, &[], &labels(&["5 year"]));
        assert_eq!(weights["10 year"], 1.0);
        // Capped, never promoted to the priority weight.
        assert!(weights["10 year"] < 2.0);
    }

    #[test]
    fn test_partial_experience_scales_linearly() {
        let all = labels(&["4 year", "2 year"]);
        let weights = label_weights(&all, &[], &labels(&["4 year"]));
        assert_eq!(weights["2 year"], 0.5);
    }

    #[test]
    fn test_fuzzy_match_tolerates_small_variations() {
        let jd = labels(&["postgresql"]);
        let candidate = labels(&["postgresql "]);
        let matched = fuzzy_match_labels(&jd, &candidate, DEFAULT_FUZZY_THRESHOLD);
        assert_eq!(matched, labels(&["postgresql"]));
    }

    #[test]
    fn test_unrelated_labels_do_not_fuzzy_match() {
        let jd = labels(&["kubernetes"]);
        let candidate = labels(&["excel"]);
        let matched = fuzzy_match_labels(&jd, &candidate, DEFAULT_FUZZY_THRESHOLD);
        assert!(matched.is_empty());
    }

    #[test]
    fn test_normalize_experience() {
        assert_eq!(normalize_experience("2 years"), 2.0);
        assert_eq!(normalize_experience("3+ yr exp"), 3.0);
        assert_eq!(normalize_experience("python"), 0.0);
        // A number without an experience keyword does not count.
        assert_eq!(normalize_experience("version 3"), 0.0);
    }

    #[test]
    fn test_cosine_zero_vector_is_zero() {
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine(&[], &[]), 0.0);
    }

    #[test]
    fn test_score_is_rounded_to_three_decimals() {
        let jd = labels(&["python", "rust", "go"]);
        let candidate = labels(&["python"]);
        let outcome = compute_weighted_similarity(&jd, &candidate, &[], DEFAULT_FUZZY_THRESHOLD);
        assert_eq!(outcome.score, (outcome.score * 1000.0).round() / 1000.0);
    }
}
