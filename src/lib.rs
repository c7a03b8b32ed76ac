//! rpzgate - Stream a remote DNS blocklist into a Response Policy Zone.
//!
//! The list is fetched over HTTP(S), filtered line by line against a local
//! allow-list, optionally rewritten from a plain domain list into RPZ
//! records, and written to a zone file. Neither the remote document nor the
//! output is held in memory.
//!
//! # Architecture
//!
//! - [`allowlist`]: Exact and right-hand domain matching
//! - [`converter`]: Per-format line converters and their registry
//! - [`filter`]: The streaming filter pass
//! - [`fetch`]: HTTP line source
//! - [`import`]: One complete run
//! - [`config`]: Configuration loading and validation
//! - [`error`]: Error types
//!
//! # Example
//!
//! ```rust
//! use rpzgate::allowlist::AllowList;
//!
//! let allowlist = AllowList::from_lines(["example.com", ".example.net"]);
//! assert!(allowlist.is_allowed("www.example.net"));
//! assert!(!allowlist.is_allowed("www.example.com"));
//! ```

pub mod allowlist;
pub mod config;
pub mod converter;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod import;

pub use config::Config;
pub use error::{Error, Result};
