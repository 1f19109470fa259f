//! Staged image attachments.
//!
//! Images are held base64-encoded until the next send, then moved into the
//! user turn as inline parts. Nothing here is persisted.

use std::fmt;
use std::fs;
use std::path::Path;

use base64::Engine;

use crate::core::conversation::{InlineData, Part};

/// Upper bound on a single encoded image (pre-base64 bytes).
pub const MAX_ATTACHMENT_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug)]
pub enum AttachmentError {
    Io(std::io::Error),
    UnsupportedType(String),
    TooLarge { bytes: usize, max_bytes: usize },
}

impl fmt::Display for AttachmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachmentError::Io(e) => write!(f, "could not read image: {e}"),
            AttachmentError::UnsupportedType(ext) => {
                write!(f, "unsupported image type: {ext}")
            }
            AttachmentError::TooLarge { bytes, max_bytes } => {
                write!(f, "image is {bytes} bytes (limit {max_bytes})")
            }
        }
    }
}

impl std::error::Error for AttachmentError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAttachment {
    pub mime_type: String,
    /// Base64 payload without the `data:` prefix.
    pub data: String,
}

impl PendingAttachment {
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Result<Self, AttachmentError> {
        if bytes.len() > MAX_ATTACHMENT_BYTES {
            return Err(AttachmentError::TooLarge {
                bytes: bytes.len(),
                max_bytes: MAX_ATTACHMENT_BYTES,
            });
        }
        Ok(Self {
            mime_type: mime_type.to_string(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        })
    }

    /// Load an image file, picking the MIME type from its extension.
    pub fn from_path(path: &Path) -> Result<Self, AttachmentError> {
        let mime_type = mime_for_path(path)?;
        let bytes = fs::read(path).map_err(AttachmentError::Io)?;
        Self::from_bytes(mime_type, &bytes)
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    pub fn to_part(&self) -> Part {
        Part::InlineImage {
            inline_data: InlineData {
                mime_type: self.mime_type.clone(),
                data: self.data.clone(),
            },
        }
    }
}

pub fn mime_for_path(path: &Path) -> Result<&'static str, AttachmentError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "gif" => Ok("image/gif"),
        "webp" => Ok("image/webp"),
        _ => Err(AttachmentError::UnsupportedType(ext)),
    }
}

/// Interpret pasted text as an image path (terminal drag-and-drop pastes
/// the path, sometimes quoted). Returns `None` unless it names an existing
/// file with an image extension.
pub fn image_path_from_paste(pasted: &str) -> Option<std::path::PathBuf> {
    let trimmed = pasted.trim().trim_matches(|c| c == '\'' || c == '"');
    if trimmed.is_empty() || trimmed.contains('\n') {
        return None;
    }
    let path = Path::new(trimmed);
    (mime_for_path(path).is_ok() && path.is_file()).then(|| path.to_path_buf())
}
