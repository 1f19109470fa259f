//! System clipboard access: copying code out of replies and pasting images in.

use std::fmt;

use arboard::{Clipboard, Error as ClipboardError};

use crate::core::attachment::{AttachmentError, PendingAttachment};

#[derive(Debug)]
pub enum ClipboardImageError {
    /// The clipboard holds no image.
    NotAvailable,
    Clipboard(String),
    Encode(String),
    Attachment(AttachmentError),
}

impl fmt::Display for ClipboardImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipboardImageError::NotAvailable => write!(f, "no image on the clipboard"),
            ClipboardImageError::Clipboard(msg) => write!(f, "clipboard error: {msg}"),
            ClipboardImageError::Encode(msg) => write!(f, "{msg}"),
            ClipboardImageError::Attachment(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ClipboardImageError {}

pub fn copy_text(text: &str) -> Result<(), String> {
    let mut clipboard = Clipboard::new().map_err(|e| e.to_string())?;
    clipboard.set_text(text.to_owned()).map_err(|e| e.to_string())
}

/// Encode raw RGBA pixels as PNG.
pub fn encode_png_rgba(
    width: usize,
    height: usize,
    rgba: &[u8],
) -> Result<Vec<u8>, ClipboardImageError> {
    let width = u32::try_from(width)
        .map_err(|_| ClipboardImageError::Encode("clipboard image is too wide".to_string()))?;
    let height = u32::try_from(height)
        .map_err(|_| ClipboardImageError::Encode("clipboard image is too tall".to_string()))?;
    let mut bytes = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut bytes, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().map_err(|e| {
            ClipboardImageError::Encode(format!("failed to write PNG header: {e}"))
        })?;
        writer.write_image_data(rgba).map_err(|e| {
            ClipboardImageError::Encode(format!("failed to encode PNG: {e}"))
        })?;
    }
    Ok(bytes)
}

/// Read the clipboard image and stage it as a PNG attachment.
pub fn read_image_attachment() -> Result<PendingAttachment, ClipboardImageError> {
    let mut clipboard =
        Clipboard::new().map_err(|e| ClipboardImageError::Clipboard(e.to_string()))?;
    let image = match clipboard.get_image() {
        Ok(image) => image,
        Err(ClipboardError::ContentNotAvailable) => return Err(ClipboardImageError::NotAvailable),
        Err(e) => return Err(ClipboardImageError::Clipboard(e.to_string())),
    };
    let png = encode_png_rgba(image.width, image.height, image.bytes.as_ref())?;
    PendingAttachment::from_bytes("image/png", &png).map_err(ClipboardImageError::Attachment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_a_png_signature() {
        let rgba = [255u8, 0, 0, 255].repeat(4);
        let png = encode_png_rgba(2, 2, &rgba).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn short_pixel_buffers_fail_to_encode() {
        let err = encode_png_rgba(4, 4, &[0u8; 8]).unwrap_err();
        assert!(matches!(err, ClipboardImageError::Encode(_)));
    }
}
