use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::leap_table::LeapTable;
use crate::time_utils::unix_to_iso8601;

const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const LEAP_LIST_URL: &str = "https://data.iana.org/time-zones/tzdb/leap-seconds.list";

/// Download a leap second list, check that it parses, and replace `dest` with it.
/// Used by `marstime leap update`.
pub fn update(url: &str, dest: &Path) -> Result<LeapTable> {
    print!("Fetching {url}… ");
    std::io::Write::flush(&mut std::io::stdout())?;

    let body = fetch(url)?;
    let table = LeapTable::parse(&body)
        .with_context(|| format!("downloaded leap second list from {url} is invalid"))?;

    if let Ok(current) = LeapTable::load(dest) {
        if current.updated() > table.updated() {
            println!("kept existing list (it is newer)");
            return Ok(current);
        }
    }

    install(dest, &body)?;
    info!(path = %dest.display(), entries = table.entries().len(), "installed leap second list");
    println!(
        "done ({} entries, expires {})",
        table.entries().len(),
        unix_to_iso8601(table.expires())
    );
    Ok(table)
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn fetch(url: &str) -> Result<String> {
    let body = ureq::AgentBuilder::new()
        .timeout_connect(Duration::from_secs(5))
        .timeout(Duration::from_secs(15))
        .build()
        .get(url)
        .set("User-Agent", &format!("marstime/{CURRENT_VERSION}"))
        .call()
        .with_context(|| format!("failed to download {url}"))?
        .into_string()?;
    Ok(body)
}

/// Write next to `dest` and rename over it so readers never see a partial file.
fn install(dest: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = dest.with_extension("list.part");
    std::fs::write(&tmp, contents)
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, dest)
        .with_context(|| format!("failed to replace {}", dest.display()))?;
    Ok(())
}

// ── tests ─────────────────────────────────────────────────────────────────────
