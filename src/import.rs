//! One import run: allow-list, fetch, filter, write.

use tokio::fs::File;
use tokio::io::BufWriter;
use tracing::{info, instrument};

use crate::allowlist::AllowList;
use crate::config::Config;
use crate::converter::converter_for_kind;
use crate::error::{OutputError, Result};
use crate::fetch::{RemoteFetcher, TransportError};
use crate::filter::{self, FilterError, FilterStats};

/// Fetch the configured list, filter it, and rewrite the output file.
///
/// The allow-list is loaded before any network access. The output file is
/// created only once the remote server has answered with a success status;
/// a failure after that point leaves a truncated file behind.
///
/// # Errors
///
/// Fails if the allow-list cannot be read, the transfer fails at any point,
/// or the output file cannot be created or written.
#[instrument(skip_all, fields(url = %config.url, converter = %config.converter))]
pub async fn run(config: &Config) -> Result<FilterStats> {
    let allowlist = match config.allowlist_path() {
        Some(path) => {
            let allowlist = AllowList::load(path).await?;
            info!(
                path = ?path,
                entries = allowlist.len(),
                suffixes = allowlist.suffix_len(),
                "loaded allow-list"
            );
            allowlist
        }
        None => {
            info!("allow-list disabled");
            AllowList::default()
        }
    };

    let converter = converter_for_kind(config.converter, config.zone_serial());
    let fetcher = RemoteFetcher::new(&config.http)?;

    info!(output = ?config.output, "fetching blocklist");
    let mut lines = fetcher.open(&config.url).await?;

    let file = File::create(&config.output)
        .await
        .map_err(|source| OutputError::Create {
            path: config.output.clone(),
            source,
        })?;
    let mut writer = BufWriter::new(file);

    let stats = filter::run(&mut lines, &mut writer, converter.as_ref(), &allowlist)
        .await
        .map_err(|err| match err {
            FilterError::Read(source) => crate::Error::from(TransportError::Interrupted {
                url: config.url.clone(),
                source,
            }),
            FilterError::Write(source) => crate::Error::from(OutputError::Write {
                path: config.output.clone(),
                source,
            }),
        })?;

    info!(
        lines = stats.lines,
        passthrough = stats.passthrough,
        written = stats.written,
        allowed = stats.allowed,
        oversized = stats.oversized,
        malformed = stats.malformed,
        "import complete"
    );
    Ok(stats)
}
