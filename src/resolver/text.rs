//! String helpers shared by the resolver strategies and alias generation.

use itertools::Itertools;
use ahash::AHashSet;

/// Canonical form of a field name: lowercase, whitespace/underscore runs become a
/// hyphen, anything outside `[a-z0-9-]` is dropped, repeated hyphens collapse.
///
/// `normalize(normalize(s)) == normalize(s)` for every input.
pub fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.to_lowercase().chars() {
        let mapped = if c.is_whitespace() || c == '_' { '-' } else { c };
        if !(mapped.is_ascii_lowercase() || mapped.is_ascii_digit() || mapped == '-') {
            continue;
        }
        if mapped == '-' && out.ends_with('-') {
            continue;
        }
        out.push(mapped);
    }
    out
}

/// Lowercased ASCII letters and digits only.
pub fn alphanumeric(input: &str) -> String {
    input
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Lowercased tokens split on whitespace and hyphens.
pub fn tokens(input: &str) -> AHashSet<String> {
    input
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Shared tokens divided by the size of the smaller token set. Zero when either is empty.
pub fn token_overlap(a: &str, b: &str) -> f64 {
    let (left, right) = (tokens(a), tokens(b));
    let shorter = left.len().min(right.len());
    if shorter == 0 {
        return 0.0;
    }
    left.intersection(&right).count() as f64 / shorter as f64
}

/// Levenshtein edit distance over chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            let cost = usize::from(ca != cb);
            row[j + 1] = (above + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = above;
        }
    }
    row[b.len()]
}

/// `1 - distance / max_len`; two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / longest as f64
}

/// The identifier with each of space, hyphen and underscore swapped for the other two.
pub fn separator_variants(input: &str) -> Vec<String> {
    const SEPARATORS: [char; 3] = [' ', '-', '_'];
    SEPARATORS
        .iter()
        .cartesian_product(SEPARATORS.iter())
        .filter(|(from, to)| from != to && input.contains(**from))
        .map(|(from, to)| input.replace(*from, &to.to_string()))
        .unique()
        .collect()
}
