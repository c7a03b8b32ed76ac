//! Converter for wildcard domain lists.

use super::{DomainListConverter, RpzConverter};

const WILDCARD_PREFIX: &str = "*.";

/// Converter for lists of `*.`-prefixed wildcard domains.
///
/// A wildcard RPZ record does not cover its apex, so `*.example.com` is
/// written together with a record for `example.com`. The allow-list is
/// checked against the bare domain: allow-listing `example.com` also
/// suppresses `*.example.com`.
///
/// Header and comment handling are the same as [`DomainListConverter`].
#[derive(Debug, Clone)]
pub struct WildcardDomainListConverter {
    inner: DomainListConverter,
}

impl WildcardDomainListConverter {
    /// Create a converter whose zone header carries the given SOA serial.
    pub fn new(serial: u32) -> Self {
        Self {
            inner: DomainListConverter::new(serial),
        }
    }
}

impl RpzConverter for WildcardDomainListConverter {
    fn begin(&self, out: &mut String) {
        self.inner.begin(out);
    }

    fn is_passthrough(&self, line: &str) -> bool {
        self.inner.is_passthrough(line)
    }

    fn extract_domain<'a>(&self, line: &'a str) -> &'a str {
        line.strip_prefix(WILDCARD_PREFIX).unwrap_or(line)
    }

    fn emit(&self, out: &mut String, line: &str) {
        if DomainListConverter::emit_comment(out, line) {
            return;
        }

        DomainListConverter::emit_block(out, line);
        if let Some(apex) = line.strip_prefix(WILDCARD_PREFIX) {
            DomainListConverter::emit_block(out, apex);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_strip_wildcard_prefix_for_matching() {
        let converter = WildcardDomainListConverter::new(1);

        assert_eq!(
            converter.extract_domain("*.ads.example.com"),
            "ads.example.com"
        );
        assert_eq!(converter.extract_domain("ads.example.com"), "ads.example.com");
        // only a leading "*." counts
        assert_eq!(converter.extract_domain("a.*.example.com"), "a.*.example.com");
    }

    #[test]
    fn should_emit_wildcard_then_apex() {
        let mut out = String::new();

        WildcardDomainListConverter::new(1).emit(&mut out, "*.ads.example.com");

        assert_eq!(out, "*.ads.example.com CNAME .\nads.example.com CNAME .\n");
    }

    #[test]
    fn should_emit_single_record_for_plain_domain() {
        let mut out = String::new();

        WildcardDomainListConverter::new(1).emit(&mut out, "ads.example.com");

        assert_eq!(out, "ads.example.com CNAME .\n");
    }

    #[test]
    fn should_share_header_and_comments_with_domain_list() {
        let wildcards = WildcardDomainListConverter::new(42);
        let domains = DomainListConverter::new(42);

        let (mut a, mut b) = (String::new(), String::new());
        wildcards.begin(&mut a);
        domains.begin(&mut b);
        wildcards.emit(&mut a, "#comment");
        domains.emit(&mut b, "#comment");

        assert_eq!(a, b);
        assert!(wildcards.is_passthrough("#comment"));
    }
}
