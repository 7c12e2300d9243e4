//! Output artifact handling
//!
//! The document is streamed into a `.part` file next to its final location
//! and only renamed into place once the crawl succeeds, so a failed crawl
//! never leaves a document behind unless asked to.

use crate::errors::{CrawlError, CrawlResult};
use crate::results::OutputArtifact;
use chrono::NaiveDate;
use regex::Regex;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Derives `{date}_{host}.md` from the root URL
///
/// The host is whatever precedes the first `/` once every `http://` and
/// `https://` has been removed, so ports and credentials are kept as typed.
pub fn default_filename(root_url: &str, date: NaiveDate) -> CrawlResult<String> {
    let scheme = Regex::new(r"https?://").map_err(|e| CrawlError::Config(e.to_string()))?;
    let stripped = scheme.replace_all(root_url, "");
    let host = stripped.split('/').next().unwrap_or_default();
    if host.is_empty() {
        return Err(CrawlError::Config(format!(
            "cannot derive an output filename from {}",
            root_url
        )));
    }

    Ok(format!("{}_{}.md", date.format("%Y-%m-%d"), host))
}

/// Resolves the final artifact path, creating the folder if needed
pub fn prepare_output_path(folder: &Path, filename: &str) -> CrawlResult<PathBuf> {
    if !folder.as_os_str().is_empty() && !folder.exists() {
        ::log::debug!("Creating output folder {}", folder.display());
        fs::create_dir_all(folder)?;
    }
    Ok(folder.join(filename))
}

/// A document being written to disk
pub struct ArtifactWriter {
    path: PathBuf,
    part_path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl ArtifactWriter {
    /// Opens the temporary file for `path`
    pub fn create(path: PathBuf) -> CrawlResult<Self> {
        let mut part_name = path
            .file_name()
            .map(|name| name.to_os_string())
            .ok_or_else(|| {
                CrawlError::Config(format!("output path {} has no file name", path.display()))
            })?;
        part_name.push(".part");
        let part_path = path.with_file_name(part_name);

        let file = File::create(&part_path)?;
        Ok(Self {
            path,
            part_path,
            writer: Some(BufWriter::new(file)),
        })
    }

    /// Moves the finished document to its final path
    pub fn commit(mut self) -> CrawlResult<OutputArtifact> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        fs::rename(&self.part_path, &self.path)?;
        let size_bytes = fs::metadata(&self.path)?.len();

        Ok(OutputArtifact {
            path: self.path.clone(),
            size_bytes,
        })
    }

    /// Throws the unfinished document away
    pub fn discard(mut self) -> CrawlResult<()> {
        self.writer.take();
        match fs::remove_file(&self.part_path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

impl Write for ArtifactWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self.writer.as_mut() {
            Some(writer) => writer.write(buf),
            None => Err(std::io::Error::other("artifact already finalized")),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for ArtifactWriter {
    fn drop(&mut self) {
        // Neither committed nor discarded
        if self.writer.take().is_some() {
            let _ = fs::remove_file(&self.part_path);
        }
    }
}
