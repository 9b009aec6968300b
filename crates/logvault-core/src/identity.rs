//! Index identity derivation.
//!
//! An index is addressed by its date: `logstash-YYYY.mm.dd` on the engine
//! and in file names, `YYYY-mm` as the partition prefix under the remote
//! bucket. Both are fully determined by the date, so the same invocation
//! always targets the same index and the same remote objects.

use chrono::{Duration, Local, NaiveDate};

use crate::{Error, Result};

/// Index name prefix shared by every date partition.
pub const INDEX_PREFIX: &str = "logstash";

const DATE_FORMAT: &str = "%Y.%m.%d";

/// Exactly ten bytes of `dddd.dd.dd`.
fn is_date_shaped(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'.'
        && bytes[7] == b'.'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit())
}

/// A resolved index identity: canonical name plus remote partition key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexIdentity {
    /// Canonical index name, e.g. `logstash-2013.07.01`
    pub name: String,
    /// Year-month partition key, e.g. `2013-07`
    pub date_partition_key: String,
}

impl IndexIdentity {
    /// Resolve an identity from an optional explicit date.
    ///
    /// An explicit date must match `YYYY.mm.dd` exactly. With no date the
    /// operative date is yesterday relative to the invoking host's local
    /// clock, which makes the default timezone-sensitive.
    pub fn resolve(date: Option<&str>) -> Result<Self> {
        let date = match date {
            Some(raw) => {
                // chrono's %Y accepts variable-width years; the wire format
                // is fixed-width, so the shape is checked first.
                if !is_date_shaped(raw) {
                    return Err(Error::InvalidDateFormat(raw.to_string()));
                }
                NaiveDate::parse_from_str(raw, DATE_FORMAT)
                    .map_err(|_| Error::InvalidDateFormat(raw.to_string()))?
            }
            None => Local::now().date_naive() - Duration::days(1),
        };
        Ok(Self::from_date(date))
    }

    /// Build the identity for a concrete date.
    pub fn from_date(date: NaiveDate) -> Self {
        let stamp = date.format(DATE_FORMAT).to_string();
        // YYYY.mm -> YYYY-mm
        let date_partition_key = stamp[..7].replace('.', "-");
        Self {
            name: format!("{}-{}", INDEX_PREFIX, stamp),
            date_partition_key,
        }
    }

    /// File name of the data archive for this index.
    pub fn archive_file_name(&self) -> String {
        format!("{}.tgz", self.name)
    }

    /// File name of the synthesized restore script for this index.
    pub fn script_file_name(&self) -> String {
        format!("{}-restore.sh", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_date_derivation() {
        let identity = IndexIdentity::resolve(Some("2013.07.01")).unwrap();
        assert_eq!(identity.name, "logstash-2013.07.01");
        assert_eq!(identity.date_partition_key, "2013-07");
        assert_eq!(identity.archive_file_name(), "logstash-2013.07.01.tgz");
        assert_eq!(identity.script_file_name(), "logstash-2013.07.01-restore.sh");
    }

    #[test]
    fn test_distinct_dates_never_collide() {
        let a = IndexIdentity::resolve(Some("2013.07.01")).unwrap();
        let b = IndexIdentity::resolve(Some("2013.07.02")).unwrap();
        let c = IndexIdentity::resolve(Some("2013.08.01")).unwrap();
        assert_ne!(a.name, b.name);
        assert_ne!(a.name, c.name);
        assert_eq!(a.date_partition_key, b.date_partition_key);
        assert_ne!(a.date_partition_key, c.date_partition_key);
    }

    #[test]
    fn test_malformed_dates_rejected() {
        for raw in [
            "2013-07-01",
            "2013.7.1",
            "20130701",
            "yesterday",
            "2013.13.40",
            "",
            // Fixed-width years only: anything else would derive a
            // malformed partition key.
            "10000.01.01",
            "213.07.01",
            " 2013.07.01",
            "2013.07.01\n",
        ] {
            match IndexIdentity::resolve(Some(raw)) {
                Err(Error::InvalidDateFormat(seen)) => assert_eq!(seen, raw),
                other => panic!("expected InvalidDateFormat for {:?}, got {:?}", raw, other),
            }
        }
    }

    #[test]
    fn test_default_date_is_yesterday_local() {
        let expected =
            IndexIdentity::from_date(Local::now().date_naive() - Duration::days(1));
        let identity = IndexIdentity::resolve(None).unwrap();
        assert_eq!(identity, expected);
    }
}
