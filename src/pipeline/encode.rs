//! Image encoding: pick the on-disk format of an embedded image.
//!
//! A stream whose only filter is `DCTDecode` already is a JPEG file, and one
//! whose only filter is `JPXDecode` already is a JPEG 2000 codestream. Those
//! bytes are written out untouched as `.jpeg` / `.jpx`. Everything else
//! (Flate, CCITT, JBIG2, uncompressed, or a chain wrapping DCT in another
//! filter) is decoded by pdfium and written as lossless `.png`.

use crate::error::ImageError;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use tracing::debug;

/// On-disk encoding of an extracted image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEncoding {
    /// Raw `DCTDecode` stream, copied byte for byte.
    Jpeg,
    /// Raw `JPXDecode` stream, copied byte for byte.
    Jpx,
    /// Decoded pixels re-encoded as PNG.
    Png,
}

impl ImageEncoding {
    /// Map a single stream filter to the encoding it implies.
    ///
    /// Accepts both the full filter names and the inline-image abbreviations.
    pub fn from_filter_name(name: &str) -> Self {
        match name.trim_start_matches('/') {
            "DCTDecode" | "DCT" => ImageEncoding::Jpeg,
            "JPXDecode" => ImageEncoding::Jpx,
            _ => ImageEncoding::Png,
        }
    }

    /// Resolve the encoding from a stream's filter chain.
    ///
    /// Only a chain of exactly one image filter keeps the stored bytes: with
    /// any other filter in front, the raw stream is not a standalone image
    /// file. An empty chain means raw samples, written as PNG.
    pub fn from_filters<'a>(filters: impl IntoIterator<Item = &'a str>) -> Self {
        let mut filters = filters.into_iter();
        match (filters.next(), filters.next()) {
            (Some(only), None) => Self::from_filter_name(only),
            _ => ImageEncoding::Png,
        }
    }

    /// Whether the stored stream bytes are written unchanged.
    pub fn is_stored_as_is(self) -> bool {
        matches!(self, ImageEncoding::Jpeg | ImageEncoding::Jpx)
    }

    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ImageEncoding::Jpeg => "jpeg",
            ImageEncoding::Jpx => "jpx",
            ImageEncoding::Png => "png",
        }
    }
}

/// An embedded image ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub encoding: ImageEncoding,
    pub bytes: Vec<u8>,
}

impl EmbeddedImage {
    /// File extension for this image, without the dot.
    pub fn extension(&self) -> &'static str {
        self.encoding.extension()
    }
}

/// Wrap stored stream bytes that are already a complete image file.
///
/// An empty stream is rejected rather than written as a zero-byte file.
pub fn stored_image(bytes: Vec<u8>, encoding: ImageEncoding) -> Result<EmbeddedImage, ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::RawDataFailed {
            detail: format!("empty {} stream", encoding.extension()),
        });
    }
    debug!("Copied {} bytes {} stream", bytes.len(), encoding.extension());
    Ok(EmbeddedImage { encoding, bytes })
}

/// Encode decoded pixels as lossless PNG, keeping the decoded colour type.
pub fn encode_png(img: &DynamicImage) -> Result<EmbeddedImage, ImageError> {
    let encoding = ImageEncoding::Png;
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| ImageError::EncodeFailed {
            format: encoding.extension(),
            detail: e.to_string(),
        })?;

    debug!(
        "Encoded {}x{} image → {} bytes png",
        img.width(),
        img.height(),
        buf.len()
    );

    Ok(EmbeddedImage {
        encoding,
        bytes: buf,
    })
}
