//! Bag-of-words vectorization of issue text.
//!
//! The vocabulary is fitted over the whole batch of texts on every run, so
//! vectors are comparable within a run but not across runs.

use std::collections::{BTreeMap, BTreeSet};

/// Common English words that carry no signal for duplicate detection.
const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at", "be",
    "been", "being", "but", "by", "can", "could", "did", "do", "does", "for", "from", "had",
    "has", "have", "he", "her", "his", "how", "if", "in", "into", "is", "it", "its", "me", "my",
    "no", "not", "of", "on", "or", "our", "she", "should", "so", "than", "that", "the", "their",
    "them", "then", "there", "these", "they", "this", "to", "up", "us", "was", "we", "were",
    "what", "when", "which", "while", "who", "will", "with", "would", "you", "your",
];

/// How term counts are turned into vector components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Weighting {
    /// Raw term counts
    #[default]
    TermFrequency,
    /// Term counts scaled by smoothed inverse document frequency
    TfIdf,
}

impl Weighting {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tf" => Some(Weighting::TermFrequency),
            "tfidf" | "tf-idf" => Some(Weighting::TfIdf),
            _ => None,
        }
    }
}

/// Numeric encoding of one issue's text.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        FeatureVector(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn dimensions(&self) -> usize {
        self.0.len()
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }

    pub fn norm(&self) -> f64 {
        self.0.iter().map(|v| v * v).sum::<f64>().sqrt()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Vectorizer {
    weighting: Weighting,
}

impl Vectorizer {
    pub fn new(weighting: Weighting) -> Self {
        Vectorizer { weighting }
    }

    /// Fit a vocabulary over `texts` and return one vector per text, in order.
    pub fn fit_transform<S: AsRef<str>>(&self, texts: &[S]) -> Vec<FeatureVector> {
        let tokenized: Vec<Vec<String>> = texts.iter().map(|t| tokenize(t.as_ref())).collect();

        let vocabulary: BTreeMap<&str, usize> = tokenized
            .iter()
            .flatten()
            .map(String::as_str)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term, idx))
            .collect();

        let idf = match self.weighting {
            Weighting::TermFrequency => vec![1.0; vocabulary.len()],
            Weighting::TfIdf => inverse_document_frequency(&tokenized, &vocabulary),
        };

        tokenized
            .iter()
            .map(|tokens| {
                let mut values = vec![0.0; vocabulary.len()];
                for token in tokens {
                    if let Some(&idx) = vocabulary.get(token.as_str()) {
                        values[idx] += 1.0;
                    }
                }
                for (value, weight) in values.iter_mut().zip(&idf) {
                    *value *= weight;
                }
                FeatureVector(values)
            })
            .collect()
    }
}

/// Smoothed IDF: `ln((1 + n) / (1 + df)) + 1`.
fn inverse_document_frequency(tokenized: &[Vec<String>], vocabulary: &BTreeMap<&str, usize>) -> Vec<f64> {
    let mut doc_freq = vec![0usize; vocabulary.len()];
    for tokens in tokenized {
        let unique: BTreeSet<&str> = tokens.iter().map(String::as_str).collect();
        for term in unique {
            doc_freq[vocabulary[term]] += 1;
        }
    }

    let n = tokenized.len() as f64;
    doc_freq
        .into_iter()
        .map(|df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
        .collect()
}

/// Lowercase, split on non-alphanumerics, drop one-character tokens and stop words.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() > 1)
        .filter(|w| !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}
