//! "Did you mean" hints for mistyped effect and overlay names

/// Edit distance between two strings (insertions, deletions, substitutions).
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Two rolling rows instead of the full matrix
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(substitution);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Closest candidate to `query` within `max_distance` edits, ignoring case.
pub fn closest<'a>(query: &str, candidates: &[&'a str], max_distance: usize) -> Option<&'a str> {
    let query = query.to_lowercase();
    candidates
        .iter()
        .map(|&c| (c, levenshtein_distance(&query, &c.to_lowercase())))
        .filter(|(_, d)| *d <= max_distance)
        .min_by_key(|(_, d)| *d)
        .map(|(c, _)| c)
}

/// Format a hint line, or `None` when there is nothing close enough.
pub fn format_suggestion(suggestion: Option<&str>) -> Option<String> {
    suggestion.map(|s| format!("Did you mean '{}'?", s))
}
