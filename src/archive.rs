//! Zip archive collaborator.
//!
//! A narrow container interface over the `zip` crate: a list of named entries
//! with bytes and modification times, loadable from a zip file or a directory
//! tree, and savable with a selectable compression method. Folder packing
//! delegates here; archive internals stay out of the core.

use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::{Component, Path};
use std::time::SystemTime;

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use tracing::{debug, warn};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::errors::{FileKitError, Result};
use crate::ioerr::classify;

/// Supported compression methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// No compression.
    Stored,
    /// DEFLATE.
    #[default]
    Deflated,
}

impl From<Compression> for CompressionMethod {
    fn from(c: Compression) -> Self {
        match c {
            Compression::Stored => CompressionMethod::Stored,
            Compression::Deflated => CompressionMethod::Deflated,
        }
    }
}

/// One named entry in a container.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    name: String,
    bytes: Vec<u8>,
    modified: Option<SystemTime>,
}

impl ArchiveEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// An in-memory container of named entries.
#[derive(Debug, Default)]
pub struct Archive {
    entries: Vec<ArchiveEntry>,
}

fn zip_datetime_to_system(dt: zip::DateTime) -> Option<SystemTime> {
    let naive = NaiveDate::from_ymd_opt(dt.year() as i32, dt.month() as u32, dt.day() as u32)?
        .and_hms_opt(dt.hour() as u32, dt.minute() as u32, dt.second() as u32)?;
    Some(SystemTime::from(naive.and_utc()))
}

fn system_to_zip_datetime(t: SystemTime) -> Option<zip::DateTime> {
    let dt: DateTime<Utc> = t.into();
    zip::DateTime::from_date_and_time(
        u16::try_from(dt.year()).ok()?,
        dt.month() as u8,
        dt.day() as u8,
        dt.hour() as u8,
        dt.minute() as u8,
        dt.second() as u8,
    )
    .ok()
}

/// Zip entry names use '/' regardless of the host separator.
fn entry_name(rel: &Path) -> String {
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

impl Archive {
    /// An empty container.
    pub fn create() -> Self {
        Self::default()
    }

    /// Load a container from an existing zip file. Containers the backend
    /// cannot read surface `Unsupported`.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(classify("open archive", path))?;
        let mut zip = ZipArchive::new(file)
            .map_err(|e| FileKitError::Unsupported(format!("cannot read archive: {e}")))?;

        let mut entries = Vec::with_capacity(zip.len());
        for i in 0..zip.len() {
            let mut entry = zip
                .by_index(i)
                .map_err(|e| FileKitError::Unsupported(format!("cannot read archive entry: {e}")))?;
            if entry.is_dir() {
                continue;
            }
            let mut bytes = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut bytes)?;
            entries.push(ArchiveEntry {
                name: entry.name().to_string(),
                modified: entry.last_modified().and_then(zip_datetime_to_system),
                bytes,
            });
        }
        debug!(path = %path.display(), entries = entries.len(), "opened archive");
        Ok(Self { entries })
    }

    /// Build a container from every file under `dir`, with entry names
    /// relative to `dir`.
    pub fn from_directory(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(FileKitError::NotFound(dir.to_path_buf()));
        }

        let mut archive = Self::create();
        for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(dir) else {
                continue;
            };
            let modified = entry.metadata().ok().and_then(|m| m.modified().ok());
            let file = File::open(entry.path()).map_err(classify("open file", entry.path()))?;
            archive.add_entry(&entry_name(rel), file, modified)?;
        }
        Ok(archive)
    }

    /// Add an entry, replacing any entry of the same name.
    pub fn add_entry(
        &mut self,
        name: &str,
        mut reader: impl Read,
        modified: Option<SystemTime>,
    ) -> Result<()> {
        if name.is_empty() {
            return Err(FileKitError::InvalidArgument(
                "entry name must not be empty".into(),
            ));
        }
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.entries.retain(|e| e.name != name);
        self.entries.push(ArchiveEntry {
            name: name.to_string(),
            bytes,
            modified,
        });
        Ok(())
    }

    /// Remove the entry called `name`; returns whether it was present.
    pub fn remove_entry(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.name != name);
        self.entries.len() != before
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the container as a zip file at `path` (created or truncated).
    pub fn save_to_path(&self, path: &Path, compression: Compression) -> Result<()> {
        crate::utils::ensure_parent_dir(path)?;
        let file = File::create(path).map_err(classify("create archive", path))?;
        self.save_to(file, compression)?;
        debug!(path = %path.display(), entries = self.entries.len(), "saved archive");
        Ok(())
    }

    /// Write the container as a zip stream.
    pub fn save_to<W: Write + Seek>(&self, writer: W, compression: Compression) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        for entry in &self.entries {
            let mut opts =
                SimpleFileOptions::default().compression_method(CompressionMethod::from(compression));
            if let Some(dt) = entry.modified.and_then(system_to_zip_datetime) {
                opts = opts.last_modified_time(dt);
            }
            zip.start_file(entry.name.as_str(), opts)
                .map_err(|e| FileKitError::Unsupported(format!("cannot write entry: {e}")))?;
            zip.write_all(&entry.bytes)?;
        }
        zip.finish()
            .map_err(|e| FileKitError::Unsupported(format!("cannot finish archive: {e}")))?;
        Ok(())
    }

    /// Unpack every entry below `dir`. Entry names that would escape `dir`
    /// (absolute, or containing `..`) are rejected.
    pub fn extract_to(&self, dir: &Path) -> Result<()> {
        for entry in &self.entries {
            let rel = Path::new(&entry.name);
            let escapes = rel.is_absolute()
                || rel
                    .components()
                    .any(|c| !matches!(c, Component::Normal(_)));
            if escapes {
                return Err(FileKitError::InvalidArgument(format!(
                    "entry name '{}' would escape the extraction directory",
                    entry.name
                )));
            }

            let target = dir.join(rel);
            crate::utils::ensure_parent_dir(&target)?;
            std::fs::write(&target, &entry.bytes).map_err(classify("extract entry", &target))?;
            if let Some(t) = entry.modified {
                let mtime = filetime::FileTime::from_system_time(t);
                if let Err(e) = filetime::set_file_mtime(&target, mtime) {
                    warn!(path = %target.display(), error = %e, "failed to restore entry mtime");
                }
            }
        }
        Ok(())
    }
}
