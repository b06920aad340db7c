//! Simplification of mangled Rust symbol names for display and grouping.
//!
//! Symbols in samply captures come straight from the symbol table, so they
//! carry legacy-mangling artifacts: a trailing `::h<16 hex digits>` hash and
//! `$LT$`-style escapes for punctuation. Aggregation keys on the normalized
//! name, which also merges monomorphizations that only differ by hash.

use crate::utils::config::MAX_DEMANGLED_LEN;

/// Escape tokens emitted by the legacy Rust mangling scheme.
///
/// Each token is a fixed literal, so replacement order does not matter.
const ESCAPE_TOKENS: &[(&str, &str)] = &[
    ("$LT$", "<"),
    ("$GT$", ">"),
    ("$u20$", " "),
    ("$u27$", "'"),
    ("$RF$", "&"),
    ("$BP$", "*"),
    ("$C$", ","),
    ("$SP$", "@"),
];

/// Normalize a raw symbol name into the canonical display form.
///
/// Absent or empty input yields the literal `"unknown"`. The result is the
/// identity key for all aggregation, so this must be deterministic and
/// idempotent.
pub fn normalize(raw: Option<&str>) -> String {
    let raw = match raw {
        Some(s) if !s.is_empty() => s,
        _ => return "unknown".to_string(),
    };

    let mut name = strip_hash_suffix(raw).to_string();

    for (token, replacement) in ESCAPE_TOKENS {
        if name.contains(token) {
            name = name.replace(token, replacement);
        }
    }

    // Collapse oversized generic parameter lists but keep the callable name.
    if name.chars().count() > MAX_DEMANGLED_LEN {
        if let Some(pos) = name.find('<') {
            name.truncate(pos);
            name.push_str("<...>");
        }
    }

    name
}

/// Strip a trailing `::h0123456789abcdef` hash suffix, if present.
///
/// The suffix must be exactly `::h` followed by 16 lowercase hex digits;
/// anything else is left untouched.
fn strip_hash_suffix(name: &str) -> &str {
    let Some(pos) = name.len().checked_sub(19) else {
        return name;
    };
    if !name.is_char_boundary(pos) {
        return name;
    }
    if let Some(hex) = name[pos..].strip_prefix("::h") {
        if hex.len() == 16 && hex.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return &name[..pos];
        }
    }
    name
}

/// Truncate a name for columnar display, appending an ellipsis.
///
/// Display-only: aggregation identity always uses the full normalized name.
pub fn shorten(name: &str, max_len: usize) -> String {
    if name.chars().count() <= max_len {
        return name.to_string();
    }
    let prefix: String = name.chars().take(max_len.saturating_sub(3)).collect();
    format!("{prefix}...")
}
