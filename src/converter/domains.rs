//! Converter for hash-commented, domain-per-line lists.

use std::time::{SystemTime, UNIX_EPOCH};

use super::{BLOCK_ACTION, RpzConverter};

/// Converter for plain domain lists.
///
/// # Format
///
/// ```text
/// # Comment
/// ads.example.com
/// tracker.example.org
/// ```
///
/// Writes a minimal zone header, turns `#` comments into `;` comments and
/// every domain into a `CNAME .` block record. The whole line is the domain.
#[derive(Debug, Clone)]
pub struct DomainListConverter {
    preamble: String,
}

impl DomainListConverter {
    /// Create a converter whose zone header carries the given SOA serial.
    pub fn new(serial: u32) -> Self {
        let preamble = format!(
            "$TTL 2h\n\
             @ IN SOA localhost. root.localhost. ({serial} 6h 1h 1w 2h)\n  \
             IN NS  localhost.\n\n"
        );
        Self { preamble }
    }

    /// Write a comment line, rewriting a leading `#` to `;`.
    ///
    /// Returns false if the line is not a comment.
    pub(crate) fn emit_comment(out: &mut String, line: &str) -> bool {
        if let Some(rest) = line.strip_prefix('#') {
            out.push(';');
            out.push_str(rest);
        } else if line.starts_with(';') {
            out.push_str(line);
        } else {
            return false;
        }
        out.push('\n');
        true
    }

    pub(crate) fn emit_block(out: &mut String, domain: &str) {
        out.push_str(domain);
        out.push_str(BLOCK_ACTION);
        out.push('\n');
    }
}

/// Current Unix time as a zone serial, saturating far in the future.
pub fn epoch_serial() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(1, |elapsed| {
            u32::try_from(elapsed.as_secs()).unwrap_or(u32::MAX)
        })
}

impl RpzConverter for DomainListConverter {
    fn begin(&self, out: &mut String) {
        out.push_str(&self.preamble);
    }

    fn is_passthrough(&self, line: &str) -> bool {
        matches!(line.as_bytes().first(), Some(b';' | b'#'))
    }

    fn extract_domain<'a>(&self, line: &'a str) -> &'a str {
        line
    }

    fn emit(&self, out: &mut String, line: &str) {
        if !Self::emit_comment(out, line) {
            Self::emit_block(out, line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_write_zone_header_with_serial() {
        let mut out = String::new();

        DomainListConverter::new(1_700_000_000).begin(&mut out);

        assert_eq!(
            out,
            "$TTL 2h\n\
             @ IN SOA localhost. root.localhost. (1700000000 6h 1h 1w 2h)\n\
             \x20 IN NS  localhost.\n\
             \n"
        );
    }

    #[test]
    fn should_pass_through_comments() {
        let converter = DomainListConverter::new(1);

        assert!(converter.is_passthrough("#blocked"));
        assert!(converter.is_passthrough("; already rpz"));
        assert!(!converter.is_passthrough("bad.example.com"));
        assert!(!converter.is_passthrough("*.bad.example.com"));
    }

    #[test]
    fn should_extract_whole_line_as_domain() {
        let converter = DomainListConverter::new(1);

        assert_eq!(converter.extract_domain("bad.example.com"), "bad.example.com");
        assert_eq!(converter.extract_domain("a b"), "a b");
    }

    #[test]
    fn should_emit_block_record() {
        let mut out = String::new();

        DomainListConverter::new(1).emit(&mut out, "bad.example.com");

        assert_eq!(out, "bad.example.com CNAME .\n");
    }

    #[test]
    fn should_rewrite_only_first_hash() {
        let mut out = String::new();

        DomainListConverter::new(1).emit(&mut out, "#blocked # twice");

        assert_eq!(out, ";blocked # twice\n");
    }

    #[test]
    fn should_keep_semicolon_comments_verbatim() {
        let mut out = String::new();

        DomainListConverter::new(1).emit(&mut out, "; note");

        assert_eq!(out, "; note\n");
    }

    #[test]
    fn should_derive_serial_from_clock() {
        // 2023-11-14, well before any test run
        assert!(epoch_serial() > 1_700_000_000);
    }
}
