//! Streaming filter that applies the allow-list while converting lines.
//!
//! One line is classified, matched and written before the next one is read,
//! so memory use does not grow with the size of the source list.

use std::future::Future;
use std::io;

use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt, Lines};

use crate::allowlist::AllowList;
use crate::converter::RpzConverter;

/// Longest candidate domain that is still considered, in bytes.
///
/// Leaves room below the 253-byte DNS name limit for the zone suffix the
/// serving nameserver appends.
pub const MAX_DOMAIN_LENGTH: usize = 240;

/// Lazy, finite producer of text lines without their terminators.
pub trait LineSource {
    /// Returns the next line, or `None` once the source is exhausted.
    fn next_line(&mut self) -> impl Future<Output = io::Result<Option<String>>>;
}

impl<R> LineSource for Lines<R>
where
    R: AsyncBufRead + Unpin,
{
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        Lines::next_line(self).await
    }
}

/// Error type for a filter pass.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// Reading from the line source failed.
    #[error("failed to read source line: {0}")]
    Read(#[source] io::Error),

    /// Writing to the output failed.
    #[error("failed to write output: {0}")]
    Write(#[source] io::Error),
}

/// Counters collected during a filter pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FilterStats {
    /// Non-empty lines read from the source.
    pub lines: u64,
    /// Lines emitted without allow-list evaluation.
    pub passthrough: u64,
    /// Candidate lines that were emitted.
    pub written: u64,
    /// Candidate lines dropped by the allow-list.
    pub allowed: u64,
    /// Candidate lines dropped because the domain was too long.
    pub oversized: u64,
    /// Candidate lines dropped because no domain could be extracted.
    pub malformed: u64,
}

/// Run one full pass from `source` to `output`.
///
/// Empty lines are skipped. Empty, oversized and allow-listed candidates are
/// dropped without logging: upstream feeds routinely carry garbage and the
/// drops are not actionable, so the pass is lossy on purpose. Single-label
/// domains are not treated as malformed and are written like any other
/// candidate that the allow-list does not cover.
///
/// `output` is flushed but not shut down.
///
/// # Errors
///
/// Returns [`FilterError::Read`] if the source fails mid-stream and
/// [`FilterError::Write`] if the output cannot be written. Anything written
/// before the failure stays in the output.
pub async fn run<S, W>(
    source: &mut S,
    output: &mut W,
    converter: &dyn RpzConverter,
    allowlist: &AllowList,
) -> Result<FilterStats, FilterError>
where
    S: LineSource,
    W: AsyncWrite + Unpin,
{
    let mut stats = FilterStats::default();
    let mut buf = String::new();

    converter.begin(&mut buf);
    write_buffered(output, &mut buf).await?;

    while let Some(line) = source.next_line().await.map_err(FilterError::Read)? {
        if line.is_empty() {
            continue;
        }
        stats.lines += 1;

        if converter.is_passthrough(&line) {
            converter.emit(&mut buf, &line);
            stats.passthrough += 1;
        } else {
            let domain = converter.extract_domain(&line);
            if domain.is_empty() {
                stats.malformed += 1;
                continue;
            }
            if domain.len() > MAX_DOMAIN_LENGTH {
                stats.oversized += 1;
                continue;
            }
            if allowlist.is_allowed(domain) {
                stats.allowed += 1;
                continue;
            }
            converter.emit(&mut buf, &line);
            stats.written += 1;
        }

        write_buffered(output, &mut buf).await?;
    }

    converter.finish(&mut buf);
    write_buffered(output, &mut buf).await?;
    output.flush().await.map_err(FilterError::Write)?;

    Ok(stats)
}

async fn write_buffered<W>(output: &mut W, buf: &mut String) -> Result<(), FilterError>
where
    W: AsyncWrite + Unpin,
{
    if !buf.is_empty() {
        output
            .write_all(buf.as_bytes())
            .await
            .map_err(FilterError::Write)?;
        buf.clear();
    }
    Ok(())
}
