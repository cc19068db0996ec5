//! Tenant extraction from request paths.
//!
//! All functions here are pure: the same path and prefix always produce the
//! same result.

use crate::core::TenantId;
use percent_encoding::percent_decode_str;
use std::borrow::Cow;

/// Percent-decodes a request path once. Invalid UTF-8 sequences become
/// U+FFFD; a path with no escapes is borrowed unchanged.
pub fn decode_path(path: &str) -> Cow<'_, str> {
    percent_decode_str(path).decode_utf8_lossy()
}

/// Drops the leading separator, which may be any single character.
fn skip_separator(remainder: &str) -> Option<&str> {
    let mut chars = remainder.chars();
    chars.next()?;
    Some(chars.as_str())
}

/// Extracts the tenant name that follows `prefix` in `path`.
///
/// The remainder after `prefix` is expected to start with a separator. The
/// tenant is the text between that separator and the next `/`, or the whole
/// rest of the remainder when no later `/` exists. Nothing after the separator
/// yields an empty tenant.
///
/// Callers check `path.starts_with(prefix)` first; a path without the prefix
/// yields an empty tenant.
pub fn resolve_tenant(path: &str, prefix: &str) -> TenantId {
    let Some(remainder) = path.strip_prefix(prefix) else {
        return TenantId::default();
    };
    let Some(after_separator) = skip_separator(remainder) else {
        return TenantId::default();
    };

    match after_separator.find('/') {
        Some(pos) if pos > 0 => TenantId::new(&after_separator[..pos]),
        _ => TenantId::new(after_separator),
    }
}

/// Removes the configured global prefix from the front of `path`, if present.
pub fn strip_path_prefix<'a>(path: &'a str, prefix: &str) -> &'a str {
    if prefix.is_empty() {
        return path;
    }
    path.strip_prefix(prefix).unwrap_or(path)
}

/// Finds the leading tenant segment of an already prefix-stripped path.
///
/// Only a segment that is closed by a second `/` counts: `/idx/select` yields
/// `("idx", "/select")`, while `/idx` and `//select` yield nothing.
pub fn tenant_segment(path: &str) -> Option<(TenantId, &str)> {
    let after_separator = skip_separator(path)?;
    let pos = after_separator.find('/')?;
    if pos == 0 {
        return None;
    }
    Some((
        TenantId::new(&after_separator[..pos]),
        &after_separator[pos..],
    ))
}
