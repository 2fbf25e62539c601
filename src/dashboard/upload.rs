//! Upload Simulator
//!
//! Validation, progress bookkeeping and table rows for simulated file
//! uploads. Nothing is transferred: an accepted file advances a progress
//! counter by random steps and then lands in the uploaded-files table. The
//! timers driving the progress live in the engine (see `engine.rs`).

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Message shown when a file is rejected because of its extension
pub const INVALID_TYPE_MESSAGE: &str = "Invalid file type. Please upload CSV or MAT files only.";

/// Message shown when a simulated upload completes
pub const UPLOAD_SUCCESS_MESSAGE: &str = "File uploaded successfully!";

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// File-like descriptor as supplied by a drop or a file input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// MIME type reported by the client, often empty
    #[serde(default, rename = "type")]
    pub mime_type: String,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: String::new(),
        }
    }

    pub fn with_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Lowercased text after the last '.', or the whole name if there is none
    pub fn extension(&self) -> String {
        extension_of(&self.name).to_lowercase()
    }
}

fn extension_of(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Which extensions are accepted
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    allowed: Vec<String>,
}

impl UploadPolicy {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed: allowed
                .into_iter()
                .map(|s| s.as_ref().trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    pub fn accepts(&self, file: &FileDescriptor) -> bool {
        let ext = file.extension();
        self.allowed.iter().any(|a| *a == ext)
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new(["csv", "mat"])
    }
}

/// Row of the uploaded-files table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub name: String,
    /// Uppercased extension, e.g. "CSV"
    pub file_type: String,
    /// Human-readable size, e.g. "1.5 KB"
    pub size: String,
    pub size_bytes: u64,
    /// Upload time as `YYYY-MM-DD HH:MM` (UTC)
    pub uploaded_at: String,
    pub status: UploadStatus,
}

impl UploadedFile {
    pub fn completed(file: &FileDescriptor, at: DateTime<Utc>) -> Self {
        Self {
            name: file.name.clone(),
            file_type: extension_of(&file.name).to_uppercase(),
            size: format_file_size(file.size),
            size_bytes: file.size,
            uploaded_at: format_upload_time(at),
            status: UploadStatus::Completed,
        }
    }

    /// Cells in table column order
    pub fn cells(&self) -> [String; 5] {
        [
            self.name.clone(),
            self.file_type.clone(),
            self.size.clone(),
            self.uploaded_at.clone(),
            self.status.to_string(),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadStatus {
    Completed,
}

impl std::fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadStatus::Completed => f.write_str("Completed"),
        }
    }
}

/// Progress indicator of an upload in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadProgress {
    pub id: u64,
    pub name: String,
    /// Raw counter, may overshoot 100
    #[serde(skip)]
    pub counter: f64,
    /// Displayed percentage, clamped to 100
    pub percent: f64,
    pub complete: bool,
}

impl UploadProgress {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            counter: 0.0,
            percent: 0.0,
            complete: false,
        }
    }

    /// Advance the counter by a random step in `[0, max_step)`.
    ///
    /// Returns true once the counter reaches 100.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R, max_step: f64) -> bool {
        self.counter += rng.gen::<f64>() * max_step;
        self.percent = self.counter.min(100.0);
        if self.counter >= 100.0 {
            self.complete = true;
        }
        self.complete
    }

    /// Status line shown next to the bar
    pub fn label(&self) -> String {
        if self.complete {
            format!("{} - Upload Complete", self.name)
        } else {
            format!("{} - Uploading...", self.name)
        }
    }
}

/// Outcome of submitting a batch of files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// Upload ids of accepted files, in submission order
    pub accepted: Vec<AcceptedUpload>,
    /// Names of files rejected because of their extension
    pub rejected: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptedUpload {
    pub id: u64,
    pub name: String,
}

/// Format a byte count with base-1024 units, two decimals, trailing zeros dropped
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    // floor(log1024(bytes)), exact at powers of 1024
    let mut exponent = 0;
    let mut scaled = bytes;
    while scaled >= 1024 && exponent < SIZE_UNITS.len() - 1 {
        scaled /= 1024;
        exponent += 1;
    }
    let value = bytes as f64 / 1024_f64.powi(exponent as i32);

    format!("{} {}", trim_decimals(value), SIZE_UNITS[exponent])
}

fn trim_decimals(value: f64) -> String {
    // Ties round up; bytes / 1024^n is exact, so x.xx5 really is a tie
    let rounded = (value * 100.0).round() / 100.0;
    let fixed = format!("{:.2}", rounded);
    if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        fixed
    }
}

/// Minute-resolution UTC timestamp used in the uploads table
pub fn format_upload_time(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}
