//! Default settings for the `hashvp` binary.
//!
//! These are compile-time constants; every one of them can be overridden
//! by the matching command-line flag.

/// Index file read by `query`, `interactive` and `serve`, written by `generate`.
pub const DEFAULT_TREE_PATH: &str = "./tree.hvp";

/// abuse.ch full export, unzipped.
pub const DEFAULT_CSV_PATH: &str = "./malware.csv";

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5555";

/// Route the HTTP query endpoint is mounted on.
pub const DEFAULT_BASE_PATH: &str = "/";

/// Number of neighbors returned when a query does not ask for a count.
pub const DEFAULT_COUNT: u16 = 10;

/// Columns in the abuse.ch export: first_seen_utc, sha256_hash, md5_hash,
/// sha1_hash, reporter, file_name, file_type_guess, mime_type, signature,
/// clamav, vtpercent, imphash, ssdeep, tlsh.
pub const CSV_FIELD_COUNT: usize = 14;

/// zstd level for the on-disk index.
pub const ZSTD_LEVEL: i32 = 3;

/// Log filter used when neither `--log-level` nor `RUST_LOG` is given.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Seconds in-flight TLS connections get to finish on shutdown.
pub const SHUTDOWN_GRACE_SECS: u64 = 10;
