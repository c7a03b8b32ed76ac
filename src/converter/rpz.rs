//! Pass-through converter for sources that are already RPZ zones.

use super::RpzConverter;

/// Converter for sources already in RPZ format.
///
/// Directives (`$TTL`), comments (`;`), the apex (`@`) and continuation
/// lines (leading space) are passed through. Every other line is a resource
/// record whose owner name is the first whitespace-delimited token.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughConverter;

impl RpzConverter for PassThroughConverter {
    fn is_passthrough(&self, line: &str) -> bool {
        matches!(line.as_bytes().first(), Some(b';' | b'$' | b'@' | b' '))
    }

    fn extract_domain<'a>(&self, line: &'a str) -> &'a str {
        line.split_whitespace().next().unwrap_or("")
    }

    fn emit(&self, out: &mut String, line: &str) {
        out.push_str(line);
        out.push('\n');
    }
}
