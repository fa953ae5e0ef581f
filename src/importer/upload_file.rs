// ==========================================
// PTM upload validator - uploaded file
// ==========================================
// The user-selected file: name + original bytes
// The same bytes are forwarded untouched on submission
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use std::fs;
use std::path::Path;

/// Accepted upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Xlsx,
}

impl FileKind {
    /// Resolve the format from the file name's extension (case-insensitive)
    pub fn from_file_name(file_name: &str) -> ImportResult<Self> {
        let ext = file_extension(file_name);
        match ext.as_str() {
            "csv" => Ok(FileKind::Csv),
            "xlsx" => Ok(FileKind::Xlsx),
            "" => Err(ImportError::UnsupportedFormat(file_name.to_string())),
            _ => Err(ImportError::UnsupportedFormat(format!(".{}", ext))),
        }
    }
}

/// Lowercased text after the last '.', empty when there is none
pub fn file_extension(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((_, ext)) => ext.trim().to_lowercase(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk, refusing oversize files before loading them
    ///
    /// # Arguments
    /// - path: file on disk
    /// - max_size_bytes: upload size limit
    pub fn from_path<P: AsRef<Path>>(path: P, max_size_bytes: u64) -> ImportResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let size_bytes = fs::metadata(path)?.len();
        if size_bytes > max_size_bytes {
            return Err(ImportError::FileTooLarge {
                size_bytes,
                limit_bytes: max_size_bytes,
            });
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self::new(name, fs::read(path)?))
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn kind(&self) -> ImportResult<FileKind> {
        FileKind::from_file_name(&self.name)
    }
}
