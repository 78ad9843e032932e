//! Malware samples as listed in the abuse.ch MalwareBazaar export.

use serde::{Deserialize, Serialize};

use crate::tlsh::{clean_hash, TlshDigest, TlshError};
use crate::vptree::MetricItem;

/// Column names of the export, in file order.
pub const COLUMNS: [&str; 14] = [
    "first_seen_utc", "sha256_hash", "md5_hash", "sha1_hash", "reporter", "file_name",
    "file_type_guess", "mime_type", "signature", "clamav", "vtpercent", "imphash", "ssdeep",
    "tlsh",
];

/// One row of the export. Field order matches the CSV columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRecord {
    #[serde(rename = "first_seen_utc")]
    pub first_seen: String,
    #[serde(rename = "sha256_hash")]
    pub sha256: String,
    #[serde(rename = "md5_hash")]
    pub md5: String,
    #[serde(rename = "sha1_hash")]
    pub sha1: String,
    pub reporter: String,
    pub file_name: String,
    pub file_type_guess: String,
    pub mime_type: String,
    pub signature: String,
    pub clamav: String,
    #[serde(rename = "vtpercent")]
    pub vt_percent: String,
    pub imphash: String,
    pub ssdeep: String,
    pub tlsh: String,
}

impl SampleRecord {
    /// Field values in `COLUMNS` order.
    pub fn values(&self) -> [&str; 14] {
        [
            self.first_seen.as_str(), self.sha256.as_str(), self.md5.as_str(),
            self.sha1.as_str(), self.reporter.as_str(), self.file_name.as_str(),
            self.file_type_guess.as_str(), self.mime_type.as_str(), self.signature.as_str(),
            self.clamav.as_str(), self.vt_percent.as_str(), self.imphash.as_str(),
            self.ssdeep.as_str(), self.tlsh.as_str(),
        ]
    }
}

/// A record together with its parsed TLSH digest; the item type indexed
/// by the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    record: SampleRecord,
    digest: TlshDigest
}

impl Sample {
    /// Parse the record's `tlsh` column.
    pub fn new(record: SampleRecord) -> Result<Sample, TlshError> {
        let digest = TlshDigest::parse(clean_hash(&record.tlsh))?;
        Ok(Sample { record: record, digest: digest })
    }

    /// A bare digest to search with; its record is empty.
    pub fn query(digest: TlshDigest) -> Sample {
        Sample { record: SampleRecord::default(), digest: digest }
    }

    pub fn record(&self) -> &SampleRecord {
        &self.record
    }

    pub fn digest(&self) -> &TlshDigest {
        &self.digest
    }
}

impl MetricItem<f64> for Sample {
    fn distance(&self, other: &Self) -> f64 {
        f64::from(self.digest.diff(&other.digest))
    }
}
