//! Leap second table in the NTP `leap-seconds.list` format, and TAI-UTC lookup.
//!
//! The file distributed by IANA/IERS looks like this:
//!
//! ```text
//! #$	 3676924800
//! #@	 3928521600
//! 2272060800	10	# 1 Jan 1972
//! 2287785600	11	# 1 Jul 1972
//! ```
//!
//! `#$` carries the publication instant, `#@` the expiry, and every line that
//! starts with a digit is `<NTP seconds> <TAI-UTC>`. All instants are seconds
//! since 1900-01-01 and are stored here as Unix seconds.

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::{MarsTimeError, Result};

/// Seconds between the NTP epoch (1900-01-01) and the Unix epoch (1970-01-01).
pub const NTP_UNIX_OFFSET: i64 = 2_208_988_800;

pub fn ntp_to_unix(ntp: i64) -> i64 {
    ntp - NTP_UNIX_OFFSET
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeapEntry {
    /// First UTC second (Unix time) at which `offset` applies.
    pub effective_at: i64,
    /// Cumulative TAI-UTC in seconds.
    pub offset: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeapTable {
    updated: i64,
    expires: i64,
    entries: Vec<LeapEntry>,
}

/// How far a resolved offset can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetStatus {
    Authoritative,
    /// Before the first entry (1972); zero is assumed.
    PreRange,
    /// After the table's expiry; the last known offset is assumed.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Offset {
    pub seconds: i32,
    pub status: OffsetStatus,
}

impl Offset {
    pub fn is_authoritative(&self) -> bool {
        self.status == OffsetStatus::Authoritative
    }
}

impl LeapTable {
    /// Read and parse a leap second file. The file is closed before parsing.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| MarsTimeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::parse(&contents)?;
        debug!(
            path = %path.display(),
            entries = table.entries.len(),
            "loaded leap second table"
        );
        Ok(table)
    }

    /// Parse leap second data. Malformed data lines, out-of-order entries and
    /// missing `#$`/`#@` lines are rejected.
    pub fn parse(contents: &str) -> Result<Self> {
        let mut updated = None;
        let mut expires = None;
        let mut entries: Vec<LeapEntry> = Vec::new();

        for (idx, line) in contents.lines().enumerate() {
            let lineno = idx + 1;
            if let Some(rest) = line.strip_prefix("#$") {
                updated = Some(parse_ntp_field(rest, lineno, "update timestamp")?);
            } else if let Some(rest) = line.strip_prefix("#@") {
                expires = Some(parse_ntp_field(rest, lineno, "expiry timestamp")?);
            } else if line.starts_with(|c: char| c.is_ascii_digit()) {
                let entry = parse_entry(line, lineno)?;
                if let Some(prev) = entries.last() {
                    if entry.effective_at <= prev.effective_at {
                        return Err(MarsTimeError::format(
                            lineno,
                            "entries must be strictly increasing in time",
                        ));
                    }
                }
                entries.try_reserve(1)?;
                entries.push(entry);
            }
        }

        Ok(LeapTable {
            updated: updated.ok_or(MarsTimeError::MissingMetadata("#$ (updated)"))?,
            expires: expires.ok_or(MarsTimeError::MissingMetadata("#@ (expires)"))?,
            entries,
        })
    }

    pub fn updated(&self) -> i64 {
        self.updated
    }

    pub fn expires(&self) -> i64 {
        self.expires
    }

    pub fn entries(&self) -> &[LeapEntry] {
        &self.entries
    }

    pub fn is_expired_at(&self, instant: i64) -> bool {
        instant > self.expires
    }

    /// TAI-UTC in effect at the UTC second `instant`.
    ///
    /// An instant equal to an entry's `effective_at` selects that entry.
    pub fn offset(&self, instant: i64) -> Result<Offset> {
        let last = self.entries.last().ok_or(MarsTimeError::EmptyTable)?;

        let seconds = if instant >= last.effective_at {
            last.offset
        } else {
            match self
                .entries
                .binary_search_by_key(&instant, |e| e.effective_at)
            {
                Ok(idx) => self.entries[idx].offset,
                Err(0) => {
                    return Ok(Offset {
                        seconds: 0,
                        status: OffsetStatus::PreRange,
                    });
                }
                Err(idx) => self.entries[idx - 1].offset,
            }
        };

        let status = if self.is_expired_at(instant) {
            OffsetStatus::Stale
        } else {
            OffsetStatus::Authoritative
        };
        Ok(Offset { seconds, status })
    }
}

#[cfg(test)]
impl LeapTable {
    pub(crate) fn from_parts(updated: i64, expires: i64, entries: &[(i64, i32)]) -> Self {
        LeapTable {
            updated,
            expires,
            entries: entries
                .iter()
                .map(|&(effective_at, offset)| LeapEntry {
                    effective_at,
                    offset,
                })
                .collect(),
        }
    }
}

fn parse_ntp_field(rest: &str, lineno: usize, what: &str) -> Result<i64> {
    let field = rest
        .split_whitespace()
        .next()
        .ok_or_else(|| MarsTimeError::format(lineno, format!("missing {what}")))?;
    let ntp: i64 = field
        .parse()
        .map_err(|e| MarsTimeError::format(lineno, format!("bad {what} '{field}': {e}")))?;
    Ok(ntp_to_unix(ntp))
}

fn parse_entry(line: &str, lineno: usize) -> Result<LeapEntry> {
    // Data lines usually carry a trailing "# 1 Jan 1972" comment.
    let data = line.split('#').next().unwrap_or_default();
    let fields: Vec<&str> = data.split_whitespace().collect();
    let [instant, offset] = fields.as_slice() else {
        return Err(MarsTimeError::format(
            lineno,
            format!("expected '<ntp seconds> <offset>', found {} fields", fields.len()),
        ));
    };

    let ntp: i64 = instant
        .parse()
        .map_err(|e| MarsTimeError::format(lineno, format!("bad instant '{instant}': {e}")))?;
    let offset: i32 = offset
        .parse()
        .map_err(|e| MarsTimeError::format(lineno, format!("bad offset '{offset}': {e}")))?;

    Ok(LeapEntry {
        effective_at: ntp_to_unix(ntp),
        offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
#	This is a trimmed copy of leap-seconds.list
#$	 3692217600
#@	 3723753600
#
2272060800	10	# 1 Jan 1972
2287785600	11	# 1 Jul 1972
#h	16edd0f0 3666784f 37db7bdf d7b2ba1c 9c6a5d3a
";

    fn small_table(expires: i64) -> LeapTable {
        LeapTable::from_parts(0, expires, &[(1000, 10), (2000, 11), (3000, 12)])
    }

    #[test]
    fn parses_metadata_and_entries() {
        let table = LeapTable::parse(SAMPLE).unwrap();
        assert_eq!(table.updated(), 1_483_228_800);
        assert_eq!(table.expires(), 1_514_764_800);
        assert_eq!(
            table.entries(),
            &[
                LeapEntry {
                    effective_at: 63_072_000,
                    offset: 10
                },
                LeapEntry {
                    effective_at: 78_796_800,
                    offset: 11
                },
            ]
        );
    }

    #[test]
    fn loads_from_disk() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "{SAMPLE}").unwrap();
        let table = LeapTable::load(tmp.path()).unwrap();
        assert_eq!(table.entries().len(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = LeapTable::load(Path::new("/nonexistent/leap-seconds.list")).unwrap_err();
        assert!(matches!(err, MarsTimeError::Io { .. }));
    }

    #[test]
    fn rejects_malformed_data_line() {
        let text = "#$ 3692217600\n#@ 3723753600\n2272060800\n";
        let err = LeapTable::parse(text).unwrap_err();
        assert!(matches!(err, MarsTimeError::Format { line: 3, .. }));

        let text = "#$ 3692217600\n#@ 3723753600\n2272060800 ten\n";
        assert!(matches!(
            LeapTable::parse(text).unwrap_err(),
            MarsTimeError::Format { line: 3, .. }
        ));
    }

    #[test]
    fn rejects_bad_metadata() {
        let text = "#$ soon\n#@ 3723753600\n";
        assert!(matches!(
            LeapTable::parse(text).unwrap_err(),
            MarsTimeError::Format { line: 1, .. }
        ));
    }

    #[test]
    fn rejects_out_of_order_entries() {
        let text = "#$ 3692217600\n#@ 3723753600\n2287785600 11\n2272060800 10\n";
        assert!(matches!(
            LeapTable::parse(text).unwrap_err(),
            MarsTimeError::Format { line: 4, .. }
        ));
        let dup = "#$ 3692217600\n#@ 3723753600\n2272060800 10\n2272060800 10\n";
        assert!(LeapTable::parse(dup).is_err());
    }

    #[test]
    fn requires_expiry() {
        let text = "#$ 3692217600\n2272060800 10\n";
        assert!(matches!(
            LeapTable::parse(text).unwrap_err(),
            MarsTimeError::MissingMetadata(_)
        ));
    }

    #[test]
    fn lookup_at_boundaries() {
        let table = small_table(4000);
        let at = |t| table.offset(t).unwrap();

        assert_eq!(
            at(999),
            Offset {
                seconds: 0,
                status: OffsetStatus::PreRange
            }
        );
        assert_eq!(at(1000).seconds, 10);
        assert_eq!(at(1999).seconds, 10);
        assert_eq!(at(2000).seconds, 11);
        assert_eq!(at(2999).seconds, 11);
        assert_eq!(at(3000).seconds, 12);
        assert_eq!(at(3500).seconds, 12);
        assert!(at(3500).is_authoritative());
    }

    #[test]
    fn lookup_past_expiry_is_stale() {
        let table = small_table(3200);
        let off = table.offset(3500).unwrap();
        assert_eq!(off.seconds, 12);
        assert_eq!(off.status, OffsetStatus::Stale);
        assert!(table.is_expired_at(3500));
        assert!(!table.is_expired_at(3200));
    }

    #[test]
    fn lookup_in_long_table() {
        let entries: Vec<(i64, i32)> = (0..28).map(|i| (1000 + i * 100, 10 + i as i32)).collect();
        let table = LeapTable::from_parts(0, i64::MAX, &entries);
        for &(t, off) in &entries {
            assert_eq!(table.offset(t).unwrap().seconds, off);
            assert_eq!(table.offset(t + 99).unwrap().seconds, off);
        }
    }

    #[test]
    fn empty_table_is_an_error() {
        let table = LeapTable::parse("#$ 3692217600\n#@ 3723753600\n").unwrap();
        assert!(matches!(table.offset(0), Err(MarsTimeError::EmptyTable)));
    }
}
