use lazy_static::lazy_static;
use regex::bytes::Regex;

pub(crate) const DEFAULT_WHOLE_STREAM_SIZE_LIMIT: u64 = u64::MAX;
pub(crate) const DEFAULT_PER_PART_SIZE_LIMIT: u64 = u64::MAX;

pub(crate) const BOUNDARY_EXT: &str = "--";

pub(crate) const CR: u8 = b'\r';
pub(crate) const LF: u8 = b'\n';
pub(crate) const HYPHEN: u8 = b'-';
pub(crate) const COLON: u8 = b':';
pub(crate) const SPACE: u8 = b' ';

/// Bytes kept aside while a candidate boundary is being matched, on top of the
/// prefixed boundary itself: the `CR LF` that opens it.
pub(crate) const LOOKBEHIND_EXTRA: usize = 2;

lazy_static! {
    /// One `; key=value` or `; key="value"` parameter. A quoted value runs to
    /// its closing quote, so it may contain `;`.
    pub(crate) static ref CONTENT_DISPOSITION_PARAM_RE: Regex =
        Regex::new(r#"(?-u);\s*([!#$%&'*+.^_`|~0-9A-Za-z-]+)\s*=\s*(?:"((?:[^"\\]|\\.)*)"|([^;\s"]+))"#).unwrap();
}

#[inline]
pub(crate) fn is_header_field_byte(c: u8) -> bool {
    c == HYPHEN || c.is_ascii_alphabetic()
}
