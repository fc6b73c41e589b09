use crate::util;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Write `value` as `<dir>/<name>.json`, or as a single-entry deflate archive
/// `<dir>/<name>.json.zip` when `compress` is set. Returns the written path.
pub fn write_artifact<T: Serialize + ?Sized>(
    dir: &Path,
    name: &str,
    value: &T,
    compress: bool,
) -> Result<PathBuf> {
    util::ensure_dir(dir)?;
    let entry_name = format!("{name}.json");
    let bytes = serde_json::to_vec_pretty(value)
        .with_context(|| format!("serialize {entry_name}"))?;
    if !compress {
        let path = dir.join(&entry_name);
        fs::write(&path, bytes).with_context(|| format!("write {}", path.display()))?;
        return Ok(path);
    }
    let path = dir.join(format!("{entry_name}.zip"));
    let file = File::create(&path).with_context(|| format!("create {}", path.display()))?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    zip.start_file(entry_name.as_str(), options)
        .with_context(|| format!("start {entry_name} in {}", path.display()))?;
    zip.write_all(&bytes)
        .with_context(|| format!("write {}", path.display()))?;
    let mut inner = zip
        .finish()
        .with_context(|| format!("finish {}", path.display()))?;
    inner.flush()?;
    Ok(path)
}
