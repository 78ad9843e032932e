//! Query helpers and result rendering shared by the CLI and HTTP front ends.

use std::fmt::Write;

use serde::Serialize;

use crate::error::Result;
use crate::sample::{Sample, SampleRecord, COLUMNS};
use crate::tlsh::{clean_hash, TlshDigest};
use crate::SampleTree;

/// How matches are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// One YAML document per match
    Yaml,
    /// Header row, then one row per match
    Csv,
    /// Aligned key/value blocks
    Table,
}

/// A sample found near a query, with its TLSH distance.
#[derive(Debug, Clone, Serialize)]
pub struct Match<'a> {
    #[serde(flatten)]
    pub record: &'a SampleRecord,
    pub distance: f64,
}

/// Look up the `count` samples closest to `hash`, nearest first.
///
/// `hash` may carry the `T1` prefix and surrounding whitespace.
pub fn find_matches<'a>(tree: &'a SampleTree, hash: &str, count: usize)
                        -> Result<Vec<Match<'a>>> {
    let query = Sample::query(TlshDigest::parse(clean_hash(hash))?);
    Ok(tree.search(&query, count).into_iter()
        .map(|n| Match { record: n.item.record(), distance: n.distance })
        .collect())
}

/// Render `matches` in the requested format.
///
/// Every format ends with a newline unless there is nothing to print.
pub fn render(matches: &[Match], format: OutputFormat) -> Result<String> {
    if matches.is_empty() {
        return Ok(String::new());
    }
    let mut out = String::new();
    match format {
        OutputFormat::Json => {
            for m in matches {
                out.push_str(&serde_json::to_string(m)?);
                out.push('\n');
            }
        }
        OutputFormat::Yaml => {
            for m in matches {
                out.push_str("---\n");
                out.push_str(&serde_yaml::to_string(m)?);
            }
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(Vec::new());
            wtr.write_record(COLUMNS.iter().copied().chain(Some("distance")))?;
            for m in matches {
                let distance = m.distance.to_string();
                wtr.write_record(m.record.values().iter().copied()
                                 .chain(Some(distance.as_str())))?;
            }
            let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
            out.push_str(&String::from_utf8_lossy(&bytes));
        }
        OutputFormat::Table => {
            let width = COLUMNS.iter().map(|c| c.len()).max().unwrap_or(0);
            for (i, m) in matches.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                for (key, value) in COLUMNS.iter().zip(m.record.values().iter()) {
                    let _ = writeln!(out, "{:<width$}  {}", key, value, width = width);
                }
                let _ = writeln!(out, "{:<width$}  {}", "distance", m.distance, width = width);
            }
        }
    }
    Ok(out)
}
