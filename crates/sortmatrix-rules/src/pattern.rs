//! Wildcard pattern primitives.
//!
//! A pattern is either the universal wildcard `*`, a prefix wildcard
//! (`FIC*`), or a literal (`BOOK`). Comparisons are exact-case. The empty
//! pattern matches nothing.

use sortmatrix_core::WILDCARD;

/// Returns the prefix of a trailing-`*` pattern, or `None` for literals and
/// the universal wildcard.
pub fn prefix_of(pattern: &str) -> Option<&str> {
    if pattern.len() > 1 {
        pattern.strip_suffix('*')
    } else {
        None
    }
}

/// True for `*`.
pub fn is_universal(pattern: &str) -> bool {
    pattern == WILDCARD
}

/// True for any pattern that is not a plain literal.
pub fn is_wildcard(pattern: &str) -> bool {
    pattern.ends_with('*')
}

/// Check whether `pattern` accepts `value`.
///
/// A `*` value means the field is unknown, so only the universal wildcard
/// accepts it.
pub fn matches(pattern: &str, value: &str) -> bool {
    if pattern.is_empty() {
        return false;
    }
    if is_universal(pattern) {
        return true;
    }
    if value == WILDCARD {
        return false;
    }
    match prefix_of(pattern) {
        Some(prefix) => value.starts_with(prefix),
        None => value == pattern,
    }
}

/// True when every value accepted by `inner` is also accepted by `outer`.
pub fn covers(outer: &str, inner: &str) -> bool {
    if outer.is_empty() || inner.is_empty() {
        return false;
    }
    if is_universal(outer) {
        return true;
    }
    if is_universal(inner) {
        return false;
    }
    match (prefix_of(outer), prefix_of(inner)) {
        (Some(o), Some(i)) => i.starts_with(o),
        (Some(o), None) => inner.starts_with(o),
        (None, Some(_)) => false,
        (None, None) => outer == inner,
    }
}

/// True when at least one value is accepted by both patterns.
pub fn intersects(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if is_universal(a) || is_universal(b) {
        return true;
    }
    match (prefix_of(a), prefix_of(b)) {
        (Some(pa), Some(pb)) => pa.starts_with(pb) || pb.starts_with(pa),
        (Some(p), None) => b.starts_with(p),
        (None, Some(p)) => a.starts_with(p),
        (None, None) => a == b,
    }
}
