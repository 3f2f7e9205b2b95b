use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::error::AppError;

const DEFAULT_FILE_NAME: &str = "page.html";

/// Resolve where the HTML should be written.
///
/// An explicit path wins; otherwise `page.html` (or `page.html.gz`) inside
/// `output_dir`.
pub fn resolve_output_path(out: Option<&Path>, output_dir: &Path, gzip: bool) -> PathBuf {
    match out {
        Some(path) => path.to_path_buf(),
        None if gzip => output_dir.join(format!("{DEFAULT_FILE_NAME}.gz")),
        None => output_dir.join(DEFAULT_FILE_NAME),
    }
}

/// Write `html` to `path`, creating parent directories as needed.
///
/// With `gzip`, a `.gz` suffix is appended when missing and the content is
/// gzip-compressed. Returns the path actually written.
pub fn write_html(html: &str, path: &Path, gzip: bool) -> Result<PathBuf, AppError> {
    let path = if gzip { with_gz_suffix(path) } else { path.to_path_buf() };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(&path)?;
    if gzip {
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        encoder.write_all(html.as_bytes())?;
        encoder.finish()?.flush()?;
    } else {
        let mut writer = BufWriter::new(file);
        writer.write_all(html.as_bytes())?;
        writer.flush()?;
    }

    tracing::debug!(path = %path.display(), gzip, "Wrote {} bytes of HTML", html.len());
    Ok(path)
}

fn with_gz_suffix(path: &Path) -> PathBuf {
    if path.extension().is_some_and(|ext| ext == "gz") {
        return path.to_path_buf();
    }
    let mut name = path.as_os_str().to_os_string();
    name.push(".gz");
    PathBuf::from(name)
}
