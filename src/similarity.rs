use crate::github::issues::Issue;
use crate::vectorizer::FeatureVector;
use std::cmp::Ordering;

/// An existing issue together with its similarity to the target issue.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub issue: Issue,
    pub score: f64,
}

/// Cosine similarity clamped to `[0, 1]`. A zero vector is similar to nothing.
pub fn cosine_similarity(a: &FeatureVector, b: &FeatureVector) -> f64 {
    let denominator = a.norm() * b.norm();
    if denominator == 0.0 {
        return 0.0;
    }
    let dot: f64 = a
        .values()
        .iter()
        .zip(b.values())
        .map(|(x, y)| x * y)
        .sum();
    (dot / denominator).clamp(0.0, 1.0)
}

/// Score every existing issue against the target and rank the results.
///
/// `existing` and `vectors` are parallel slices.
pub fn score_candidates(
    target: &FeatureVector,
    existing: &[Issue],
    vectors: &[FeatureVector],
) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = existing
        .iter()
        .zip(vectors)
        .map(|(issue, vector)| {
            let score = cosine_similarity(target, vector);
            tracing::debug!(issue = issue.number, score, "scored candidate");
            Candidate {
                issue: issue.clone(),
                score,
            }
        })
        .collect();
    rank(&mut candidates);
    candidates
}

/// Highest score first; equal scores put the more recently created issue first.
pub fn rank(candidates: &mut [Candidate]) {
    candidates.sort_by(compare_candidates);
}

fn compare_candidates(a: &Candidate, b: &Candidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.issue.created_at.cmp(&a.issue.created_at))
        .then_with(|| b.issue.number.cmp(&a.issue.number))
}
