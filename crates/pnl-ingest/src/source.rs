//! Raw uploaded sources and their admission checks.

use std::path::Path;

use crate::error::IngestError;

/// Extensions accepted as delimited text. A name without an extension is
/// accepted too.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["csv", "txt"];

const UTF8_BOM: char = '\u{feff}';

/// One uploaded source: a display name plus its raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSource {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl RawSource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        Self::new(name, text.as_bytes().to_vec())
    }

    /// Read a file from disk, naming the source after the file name.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }

    /// Lower-cased extension of `name`, if it has one.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
    }

    /// Decode with the default extension allow-list.
    pub fn decode(&self) -> Result<String, IngestError> {
        self.decode_with(DEFAULT_ALLOWED_EXTENSIONS)
    }

    /// Validate the extension against `allowed` and decode the bytes as
    /// UTF-8, stripping a leading byte-order mark.
    pub fn decode_with<S: AsRef<str>>(&self, allowed: &[S]) -> Result<String, IngestError> {
        if let Some(ext) = self.extension() {
            if !allowed.iter().any(|a| ext.eq_ignore_ascii_case(a.as_ref())) {
                return Err(IngestError::InvalidSourceType {
                    source: self.name.clone(),
                    reason: format!("unsupported extension '{ext}'"),
                });
            }
        }

        let text = std::str::from_utf8(&self.bytes).map_err(|e| IngestError::InvalidSourceType {
            source: self.name.clone(),
            reason: format!("not UTF-8 text: {e}"),
        })?;

        Ok(text.strip_prefix(UTF8_BOM).unwrap_or(text).to_string())
    }
}
