use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

/// Reads all lines of a history file, in file order.
pub fn read_lines(path: &Path) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    BufReader::new(file).lines().collect()
}

/// Replaces the contents of `path` with `lines`, all or nothing.
///
/// The new content is staged in a temporary file in the destination
/// directory and moved into place with an atomic rename, so a concurrent
/// reader observes either the old file or the new one, never a mix.
pub fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to stage history write for {}", path.display()))?;
    for line in lines {
        writeln!(staged, "{line}")
            .with_context(|| format!("failed to stage history write for {}", path.display()))?;
    }
    staged
        .flush()
        .with_context(|| format!("failed to stage history write for {}", path.display()))?;

    staged
        .persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to replace {}", path.display()))?;

    Ok(())
}
