//! Token-overlap similarity used by the local backends.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::domain::{Example, ExampleFields};

/// Lowercased alphanumeric tokens.
pub fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// |A ∩ B| / |A ∪ B|, 0.0 when both are empty.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Best `limit` examples for the query, ties broken newest first.
pub fn rank_similar(examples: &[Example], query_inputs: &ExampleFields, limit: usize) -> Vec<Example> {
    if limit == 0 {
        return Vec::new();
    }

    let query = tokenize(&query_inputs.values().cloned().collect::<Vec<_>>().join("\n"));
    let mut scored: Vec<(f64, &Example)> = examples
        .iter()
        .map(|example| (jaccard(&query, &tokenize(&example.input_text())), example))
        .collect();

    scored.sort_by(|(sa, a), (sb, b)| {
        sb.partial_cmp(sa)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });

    scored.into_iter().take(limit).map(|(_, e)| e.clone()).collect()
}
