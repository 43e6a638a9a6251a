//! Prefix compression of pattern lists.
//!
//! Adjacent (sorted) entries sharing their first `level` characters are
//! both replaced by `prefix*`. The result may over-match codes added to the
//! catalog later, so compressed tables need a human review.

/// Compress `patterns` at `level`. A level of zero or less only sorts and
/// deduplicates.
pub fn compress(patterns: &[String], level: i32) -> Vec<String> {
    let mut list: Vec<String> = patterns.to_vec();
    list.sort();

    if let Ok(level) = usize::try_from(level)
        && level > 0
    {
        for i in 1..list.len() {
            let shared = shared_prefix(&list[i - 1], &list[i], level);
            if let Some(prefix) = shared {
                let wildcard = format!("{prefix}*");
                list[i - 1] = wildcard.clone();
                list[i] = wildcard;
            }
        }
        list.sort();
    }

    list.dedup();
    list
}

/// The first `level` characters of both patterns' literal parts, when they
/// are long enough and agree.
fn shared_prefix(a: &str, b: &str, level: usize) -> Option<String> {
    let pa = prefix_chars(a, level)?;
    let pb = prefix_chars(b, level)?;
    (pa == pb).then(|| pa.to_string())
}

fn prefix_chars(pattern: &str, level: usize) -> Option<&str> {
    let literal = pattern.strip_suffix('*').unwrap_or(pattern);
    let end = literal
        .char_indices()
        .nth(level)
        .map_or(literal.len(), |(i, _)| i);
    (literal.chars().count() >= level).then(|| &literal[..end])
}
