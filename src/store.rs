//! On-disk index files.
//!
//! A file holds the bincode-serialized tree, compressed with zstd, followed
//! by an 8 byte footer: the magic `HVP1` and a big-endian CRC32 of the
//! compressed payload. Writes go through a temporary file and a rename so
//! a crash never leaves a half-written index behind.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ZSTD_LEVEL;
use crate::error::{Error, Result};
use crate::vptree::VPTree;

const FOOTER_MAGIC: &[u8; 4] = b"HVP1";
const FOOTER_LEN: usize = 8;

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write `tree` to `path`, replacing any existing file.
pub fn save_tree<F, T>(tree: &VPTree<F, T>, path: &Path) -> Result<()>
    where F: Copy + Serialize, T: Serialize {

    let encoded = bincode::serialize(tree).map_err(Error::Encode)?;
    let payload = zstd::encode_all(encoded.as_slice(), ZSTD_LEVEL)?;
    let crc = crc32fast::hash(&payload);

    let mut output = Vec::with_capacity(payload.len() + FOOTER_LEN);
    output.extend_from_slice(&payload);
    output.extend_from_slice(FOOTER_MAGIC);
    output.extend_from_slice(&crc.to_be_bytes());

    let tmp = tmp_path(path);
    fs::write(&tmp, &output)?;
    fs::rename(&tmp, path)?;

    tracing::info!(
        path = %path.display(),
        items = tree.len(),
        bytes = output.len(),
        "saved index (CRC32={:#010x})",
        crc
    );
    Ok(())
}

/// Read a tree written by `save_tree`, verifying its checksum first.
pub fn load_tree<F, T>(path: &Path) -> Result<VPTree<F, T>>
    where F: Copy + DeserializeOwned, T: DeserializeOwned {

    let raw = fs::read(path)?;
    if raw.len() < FOOTER_LEN || &raw[raw.len() - FOOTER_LEN..raw.len() - 4] != FOOTER_MAGIC {
        return Err(Error::Corrupt(format!("{}: missing index footer", path.display())));
    }

    let (payload, footer) = raw.split_at(raw.len() - FOOTER_LEN);
    let stored = u32::from_be_bytes([footer[4], footer[5], footer[6], footer[7]]);
    let computed = crc32fast::hash(payload);
    if stored != computed {
        return Err(Error::Corrupt(format!(
            "{}: CRC32 mismatch, expected {:#010x}, got {:#010x}",
            path.display(), stored, computed
        )));
    }

    let decoded = zstd::decode_all(payload)?;
    let tree: VPTree<F, T> = bincode::deserialize(&decoded).map_err(Error::Decode)?;

    tracing::info!(path = %path.display(), items = tree.len(), "loaded index");
    Ok(tree)
}
