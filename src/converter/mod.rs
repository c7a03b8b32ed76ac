//! Line converters that turn source blocklists into RPZ records.
//!
//! Each converter handles a specific source format while the list streams
//! through the [`filter`](crate::filter):
//!
//! - **`rpz`**: the source is already a Response Policy Zone, lines pass unchanged
//! - **`domains`**: one domain per line with `#` comments
//! - **`wildcards`**: like `domains`, but `*.example.com` entries also block the apex
//!
//! # Example
//!
//! ```
//! use rpzgate::converter::{ConverterKind, RpzConverter, converter_for_kind};
//!
//! let kind: ConverterKind = "domains".parse().unwrap();
//! let converter = converter_for_kind(kind, 1);
//!
//! let mut out = String::new();
//! converter.emit(&mut out, "ads.example.com");
//! assert_eq!(out, "ads.example.com CNAME .\n");
//! ```

mod domains;
mod rpz;
mod wildcards;

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

pub use domains::{DomainListConverter, epoch_serial};
pub use rpz::PassThroughConverter;
pub use wildcards::WildcardDomainListConverter;

/// RPZ action that answers NXDOMAIN for the owner name.
pub(crate) const BLOCK_ACTION: &str = " CNAME .";

/// Strategy for rendering one source format as RPZ.
///
/// Converters hold no per-line state. Output is appended to a line buffer
/// owned by the caller, which takes care of writing and closing the sink.
pub trait RpzConverter: Send + Sync {
    /// Called once before any line is emitted.
    fn begin(&self, _out: &mut String) {}

    /// Returns true if the line is emitted without allow-list evaluation.
    fn is_passthrough(&self, line: &str) -> bool;

    /// Extract the domain to test against the allow-list.
    fn extract_domain<'a>(&self, line: &'a str) -> &'a str;

    /// Render a line that survived filtering, including its trailing newline.
    fn emit(&self, out: &mut String, line: &str);

    /// Called once after the last line, before the sink is flushed.
    fn finish(&self, _out: &mut String) {}
}

/// Registry key selecting a converter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConverterKind {
    /// Source is already in RPZ format.
    #[default]
    Rpz,
    /// Hash-commented list with one domain per line.
    Domains,
    /// Hash-commented list of `*.`-prefixed wildcard domains.
    Wildcards,
}

impl ConverterKind {
    /// Every registered converter, in display order.
    pub const ALL: [Self; 3] = [Self::Rpz, Self::Domains, Self::Wildcards];

    /// Stable lowercase name of the converter.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rpz => "rpz",
            Self::Domains => "domains",
            Self::Wildcards => "wildcards",
        }
    }
}

impl fmt::Display for ConverterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a converter name is not registered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown converter {name:?}, valid choices are: rpz, domains, wildcards")]
pub struct UnknownConverter {
    /// The name that was requested.
    pub name: String,
}

impl FromStr for ConverterKind {
    type Err = UnknownConverter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownConverter { name: s.to_string() })
    }
}

/// Returns a boxed converter for the given kind.
///
/// `serial` is the SOA serial written by converters that synthesize a zone
/// header; it is ignored by [`PassThroughConverter`].
#[must_use]
pub fn converter_for_kind(kind: ConverterKind, serial: u32) -> Box<dyn RpzConverter> {
    match kind {
        ConverterKind::Rpz => Box::new(PassThroughConverter),
        ConverterKind::Domains => Box::new(DomainListConverter::new(serial)),
        ConverterKind::Wildcards => Box::new(WildcardDomainListConverter::new(serial)),
    }
}
