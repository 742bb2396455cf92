//! JSON record sinks.
//!
//! This module provides:
//! - [`write_json_vec`]: one pretty-printed JSON array (4-space indent)
//! - [`write_jsonl_vec`]: JSON Lines, one compact document per line
//! - [`write_jsonl_par`]: JSON Lines serialized in parallel, same bytes as
//!   [`write_jsonl_vec`] (feature `parallel-io`)
//!
//! # Notes
//! - Parent directories of the output path are created as needed.
//! - Output goes to a temporary file next to the target which is renamed into
//!   place only after everything was written, so a failed write never leaves a
//!   truncated document behind. A replaced file keeps its permissions; a new
//!   one gets the usual umask-derived mode.
//! - Compression is picked from the output file name (see
//!   [`compression`](crate::io::compression)).

use crate::io::compression::auto_detect_writer;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs::create_dir_all;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use tempfile::{Builder, NamedTempFile};

/// Output document layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// A single JSON array.
    #[default]
    Json,
    /// One JSON object per line.
    Jsonl,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "jsonl" | "ndjson" => Ok(Self::Jsonl),
            other => anyhow::bail!("unknown output format '{other}' (expected json or jsonl)"),
        }
    }
}

/// Write `data` in the given layout.
///
/// # Returns
/// The number of records written.
///
/// # Errors
/// If the output cannot be created, serialized, or renamed into place.
pub fn write_records<T: Serialize + Sync>(
    path: impl AsRef<Path>,
    data: &[T],
    format: OutputFormat,
) -> Result<usize> {
    match format {
        OutputFormat::Json => write_json_vec(path, data),
        #[cfg(feature = "parallel-io")]
        OutputFormat::Jsonl => write_jsonl_par(path, data, None),
        #[cfg(not(feature = "parallel-io"))]
        OutputFormat::Jsonl => write_jsonl_vec(path, data),
    }
}

/// Write `data` as a pretty-printed JSON array.
///
/// # Errors
/// If the output cannot be created, serialized, or renamed into place.
pub fn write_json_vec<T: Serialize>(path: impl AsRef<Path>, data: &[T]) -> Result<usize> {
    let path = path.as_ref();
    write_atomically(path, |w| {
        let mut ser = Serializer::with_formatter(w, PrettyFormatter::with_indent(b"    "));
        data.serialize(&mut ser)
            .with_context(|| format!("serialize JSON array to {}", path.display()))
    })?;
    Ok(data.len())
}

/// Write `data` as JSON Lines.
///
/// # Errors
/// If the output cannot be created, serialized, or renamed into place.
pub fn write_jsonl_vec<T: Serialize>(path: impl AsRef<Path>, data: &[T]) -> Result<usize> {
    let path = path.as_ref();
    write_atomically(path, |w| {
        for (i, item) in data.iter().enumerate() {
            serde_json::to_writer(&mut *w, item)
                .with_context(|| format!("serialize item #{} to {}", i, path.display()))?;
            w.write_all(b"\n")?;
        }
        Ok(())
    })?;
    Ok(data.len())
}

/// Write JSON Lines with shards serialized in parallel.
///
/// The slice is split into contiguous shards; each is serialized into its own
/// buffer on the rayon pool, then the buffers are written in shard order.
///
/// * `shards`: if `None`, defaults to `num_cpus::get().max(2)`, clamped to `[1,n]`.
///
/// # Errors
/// If any item fails to serialize or the output cannot be written.
///
/// # Feature
/// Requires the `parallel-io` feature.
#[cfg(feature = "parallel-io")]
pub fn write_jsonl_par<T: Serialize + Sync>(
    path: impl AsRef<Path>,
    data: &[T],
    shards: Option<usize>,
) -> Result<usize> {
    use rayon::prelude::*;

    let path = path.as_ref();
    let n = data.len();
    let shards = shards.unwrap_or_else(|| num_cpus::get().max(2)).clamp(1, n.max(1));
    let chunk = n.div_ceil(shards).max(1);

    let buffers: Vec<Vec<u8>> = data
        .par_chunks(chunk)
        .map(|slice| -> Result<Vec<u8>> {
            let mut buf = Vec::with_capacity(slice.len().saturating_mul(64));
            for item in slice {
                serde_json::to_writer(&mut buf, item)?;
                buf.push(b'\n');
            }
            Ok(buf)
        })
        .collect::<Result<_>>()?;

    write_atomically(path, |w| {
        for buf in &buffers {
            w.write_all(buf)?;
        }
        Ok(())
    })?;
    Ok(n)
}

fn write_atomically<F>(path: &Path, body: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            create_dir_all(parent).with_context(|| format!("mkdir -p {}", parent.display()))?;
            parent
        }
        _ => Path::new("."),
    };
    let tmp = temp_output(dir)?;
    if let Ok(meta) = std::fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .with_context(|| format!("copy permissions of {}", path.display()))?;
    }
    let file = tmp
        .reopen()
        .with_context(|| format!("reopen {}", tmp.path().display()))?;
    let mut w = auto_detect_writer(file, path)
        .with_context(|| format!("setup compression for {}", path.display()))?;
    body(&mut *w)?;
    w.flush()
        .with_context(|| format!("flush {}", path.display()))?;
    drop(w);
    tmp.persist(path)
        .with_context(|| format!("rename into {}", path.display()))?;
    Ok(())
}

/// A temporary file in `dir`, created with the mode a plain `File::create`
/// would get (`0o666` minus the umask) rather than owner-only.
fn temp_output(dir: &Path) -> Result<NamedTempFile> {
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder
        .tempfile_in(dir)
        .with_context(|| format!("create temporary file in {}", dir.display()))
}
