//! Lexical intent matching: rank stored task texts against a free-text
//! query using tf-idf weighted cosine similarity.

use std::collections::HashMap;

/// Scores at or below this are treated as "no related task".
pub const SIMILARITY_THRESHOLD: f64 = 0.1;

/// Fallback response when no task clears the similarity threshold.
pub const NO_MATCH_RESPONSE: &str = "I couldn't find anything related to your request.";

/// Pick the stored task most similar to `input`, or `None` when the best
/// cosine score is at or below [`SIMILARITY_THRESHOLD`]. Ties go to the
/// task that appears first in `tasks`.
pub fn find_intent<'a>(input: &str, tasks: &'a [String]) -> Option<&'a str> {
    if tasks.is_empty() {
        return None;
    }
    let scores = similarity_scores(input, tasks);
    let mut best_idx = 0;
    for (idx, score) in scores.iter().enumerate() {
        if *score > scores[best_idx] {
            best_idx = idx;
        }
    }
    if scores[best_idx] > SIMILARITY_THRESHOLD {
        Some(&tasks[best_idx])
    } else {
        None
    }
}

/// Cosine similarity between the query and each task, over a tf-idf
/// vector space built from `{input} ∪ tasks`.
fn similarity_scores(input: &str, tasks: &[String]) -> Vec<f64> {
    let mut docs: Vec<Vec<String>> = Vec::with_capacity(tasks.len() + 1);
    docs.push(tokenize(input));
    for task in tasks {
        docs.push(tokenize(task));
    }

    // Document frequency per term across the whole set.
    let mut df: HashMap<&str, usize> = HashMap::new();
    for doc in &docs {
        let mut seen: Vec<&str> = Vec::new();
        for term in doc {
            if !seen.contains(&term.as_str()) {
                seen.push(term);
                *df.entry(term).or_insert(0) += 1;
            }
        }
    }

    // Smoothed idf: ln((1 + n) / (1 + df)) + 1.
    let n = docs.len() as f64;
    let idf: HashMap<&str, f64> = df
        .iter()
        .map(|(term, count)| (*term, ((1.0 + n) / (1.0 + *count as f64)).ln() + 1.0))
        .collect();

    let vectors: Vec<HashMap<&str, f64>> = docs
        .iter()
        .map(|doc| {
            let mut tf: HashMap<&str, f64> = HashMap::new();
            for term in doc {
                *tf.entry(term).or_insert(0.0) += 1.0;
            }
            for (term, weight) in tf.iter_mut() {
                *weight *= idf[term];
            }
            l2_normalize(tf)
        })
        .collect();

    let query = &vectors[0];
    vectors[1..].iter().map(|task| dot(query, task)).collect()
}

fn l2_normalize(mut vector: HashMap<&str, f64>) -> HashMap<&str, f64> {
    let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for weight in vector.values_mut() {
            *weight /= norm;
        }
    }
    vector
}

fn dot(a: &HashMap<&str, f64>, b: &HashMap<&str, f64>) -> f64 {
    a.iter()
        .filter_map(|(term, weight)| b.get(term).map(|other| weight * other))
        .sum()
}

/// Lowercased runs of alphanumeric/underscore characters, two characters
/// or longer. Single-character tokens carry no signal and are dropped.
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            current.extend(ch.to_lowercase());
        } else if !current.is_empty() {
            if current.chars().count() >= 2 {
                tokens.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
        }
    }
    if current.chars().count() >= 2 {
        tokens.push(current);
    }
    tokens
}
