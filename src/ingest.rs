//! Reading the abuse.ch MalwareBazaar CSV export.
//!
//! The export starts with a `#`-commented banner and column header, then
//! one quoted row per sample with fields separated by `", "`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::config::CSV_FIELD_COUNT;
use crate::error::Result;
use crate::sample::{Sample, SampleRecord};

/// Samples read from an export, plus counts of the rows left out.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub samples: Vec<Sample>,
    /// Rows whose `tlsh` column was empty.
    pub skipped_missing: usize,
    /// Rows whose `tlsh` column did not parse as a digest.
    pub skipped_invalid: usize,
    /// Rows without the expected number of columns.
    pub skipped_malformed: usize
}

// A space before the opening quote stops the csv reader from treating
// the field as quoted, so the quotes survive; strip them here.
fn unquote(field: &str) -> &str {
    field.strip_prefix('"')
        .and_then(|f| f.strip_suffix('"'))
        .unwrap_or(field)
}

/// Parse every sample in `reader`.
///
/// Rows without a usable TLSH digest or with the wrong column count are
/// skipped and counted; I/O and CSV syntax errors abort the read.
pub fn read_samples<R: Read>(reader: R) -> Result<IngestReport> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut report = IngestReport::default();
    for result in rdr.records() {
        let raw = result?;
        let line = raw.position().map_or(0, |p| p.line());

        if raw.len() != CSV_FIELD_COUNT {
            tracing::warn!(line, fields = raw.len(), "skipping row with unexpected column count");
            report.skipped_malformed += 1;
            continue;
        }

        let fields: StringRecord = raw.iter().map(|f| unquote(f).trim()).collect();
        let record: SampleRecord = fields.deserialize(None)?;

        if record.tlsh.is_empty() {
            tracing::debug!(sha256 = %record.sha256, "skipping sample without TLSH");
            report.skipped_missing += 1;
            continue;
        }
        match Sample::new(record) {
            Ok(sample) => report.samples.push(sample),
            Err(e) => {
                tracing::debug!(line, error = %e, "skipping sample with invalid TLSH");
                report.skipped_invalid += 1;
            }
        }
    }
    Ok(report)
}

/// Open and parse an export file.
pub fn read_samples_path(path: &Path) -> Result<IngestReport> {
    let report = read_samples(File::open(path)?)?;
    tracing::info!(
        path = %path.display(),
        samples = report.samples.len(),
        skipped_missing = report.skipped_missing,
        skipped_invalid = report.skipped_invalid,
        skipped_malformed = report.skipped_malformed,
        "read sample export"
    );
    Ok(report)
}
