use std::collections::HashMap;

use itertools::Itertools;
use unicode_normalization::UnicodeNormalization;

use crate::models::Article;

/// Batch-relative duplication signal: how many other articles in the
/// batch tell (roughly) the same story.
///
/// Built once from the full batch's `title + description` text, so every
/// article is scored against the same term space. Uses a capped-vocabulary
/// tf-idf representation and cosine similarity.
pub struct FrequencyModel {
    /// L2-normalized tf-idf vector per article. Empty when the batch text
    /// is degenerate (no usable terms).
    vectors: Vec<Vec<f32>>,
    batch_len: usize,
    threshold: f32,
}

impl FrequencyModel {
    pub fn build(batch: &[Article], max_terms: usize, threshold: f32) -> Self {
        let docs: Vec<Vec<String>> = batch
            .iter()
            .map(|a| tokenize(&format!("{} {}", a.title, a.description)))
            .collect();

        let vectors = vectorize(&docs, max_terms);
        Self {
            vectors,
            batch_len: batch.len(),
            threshold,
        }
    }

    /// Frequency score for the article at `idx`, `[0, 1]`. Singleton
    /// batches and degenerate text resolve to 0.5.
    pub fn score(&self, idx: usize) -> f32 {
        if self.batch_len <= 1 {
            return 0.5;
        }
        // no usable vocabulary: similarity is undefined, not zero
        if self.vectors.is_empty() {
            return 0.5;
        }

        let current = &self.vectors[idx];
        let similar = self
            .vectors
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != idx)
            .filter(|(_, other)| dot(current, other) > self.threshold)
            .count();

        (similar as f32 / (self.batch_len - 1) as f32).min(1.0)
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.nfc()
        .collect::<String>()
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

/// Capped-vocabulary tf-idf with smoothed idf and L2 normalization.
/// Returns an empty Vec when no document yields a single term.
fn vectorize(docs: &[Vec<String>], max_terms: usize) -> Vec<Vec<f32>> {
    let mut corpus_counts: HashMap<&str, usize> = HashMap::new();
    for doc in docs {
        for term in doc {
            *corpus_counts.entry(term.as_str()).or_insert(0) += 1;
        }
    }
    if corpus_counts.is_empty() {
        return Vec::new();
    }

    // top terms by corpus frequency, ties broken lexically for determinism
    let vocab: Vec<&str> = corpus_counts
        .iter()
        .sorted_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)))
        .take(max_terms)
        .map(|(term, _)| *term)
        .collect();
    let index: HashMap<&str, usize> = vocab
        .iter()
        .enumerate()
        .map(|(i, term)| (*term, i))
        .collect();

    let mut doc_freq = vec![0usize; vocab.len()];
    let mut term_freqs: Vec<HashMap<usize, f32>> = Vec::with_capacity(docs.len());
    for doc in docs {
        let mut tf: HashMap<usize, f32> = HashMap::new();
        for term in doc {
            if let Some(&i) = index.get(term.as_str()) {
                *tf.entry(i).or_insert(0.0) += 1.0;
            }
        }
        for &i in tf.keys() {
            doc_freq[i] += 1;
        }
        term_freqs.push(tf);
    }

    let n = docs.len() as f32;
    let idf: Vec<f32> = doc_freq
        .iter()
        .map(|&df| ((1.0 + n) / (1.0 + df as f32)).ln() + 1.0)
        .collect();

    term_freqs
        .into_iter()
        .map(|tf| {
            let mut v = vec![0.0f32; vocab.len()];
            for (i, count) in tf {
                v[i] = count * idf[i];
            }
            let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm > 0.0 {
                for x in &mut v {
                    *x /= norm;
                }
            }
            v
        })
        .collect()
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
