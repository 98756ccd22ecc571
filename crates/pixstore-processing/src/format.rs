//! Image format sniffing
//!
//! Determines the real format and pixel dimensions of a payload from its header, without
//! decoding pixel data. The filename's extension plays no part here.

use std::fmt;
use std::io::{BufRead, Seek};

use image::{ImageFormat, ImageReader};

/// Formats the sniffer accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
    WebP,
}

impl ImageKind {
    fn from_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Png => Some(ImageKind::Png),
            ImageFormat::Jpeg => Some(ImageKind::Jpeg),
            ImageFormat::Gif => Some(ImageKind::Gif),
            ImageFormat::WebP => Some(ImageKind::WebP),
            _ => None,
        }
    }

    /// Kind whose file extensions include `ext` (leading dot optional, case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        [
            ImageKind::Png,
            ImageKind::Jpeg,
            ImageKind::Gif,
            ImageKind::WebP,
        ]
        .into_iter()
        .find(|kind| kind.matches_extension(ext))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageKind::Png => "png",
            ImageKind::Jpeg => "jpeg",
            ImageKind::Gif => "gif",
            ImageKind::WebP => "webp",
        }
    }

    /// File extensions (without dot) used for this format.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ImageKind::Png => &["png"],
            ImageKind::Jpeg => &["jpg", "jpeg"],
            ImageKind::Gif => &["gif"],
            ImageKind::WebP => &["webp"],
        }
    }

    pub fn matches_extension(&self, ext: &str) -> bool {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        self.extensions()
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(ext))
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Gif => "image/gif",
            ImageKind::WebP => "image/webp",
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header facts about a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub kind: ImageKind,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("unsupported or corrupt image: {0}")]
    UnsupportedOrCorrupt(String),

    #[error("failed to read image header: {0}")]
    Io(#[from] std::io::Error),
}

/// Read just enough of `reader` to learn its format and dimensions.
///
/// Deterministic for a given input. Anything outside [`ImageKind`] is rejected even when the
/// header is recognisable.
pub fn sniff_format<R: BufRead + Seek>(reader: R) -> Result<ImageInfo, DecodeError> {
    let reader = ImageReader::new(reader).with_guessed_format()?;

    let kind = reader
        .format()
        .and_then(ImageKind::from_format)
        .ok_or_else(|| DecodeError::UnsupportedOrCorrupt("unknown image format".to_string()))?;

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| DecodeError::UnsupportedOrCorrupt(e.to_string()))?;

    Ok(ImageInfo {
        kind,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    fn encode_rgba(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255]));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), format).unwrap();
        buffer
    }

    fn encode_jpeg(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([0, 128, 255]));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)
            .unwrap();
        buffer
    }

    #[test]
    fn test_sniff_png() {
        let data = encode_rgba(320, 200, ImageFormat::Png);
        let info = sniff_format(Cursor::new(&data[..])).unwrap();
        assert_eq!(
            info,
            ImageInfo {
                kind: ImageKind::Png,
                width: 320,
                height: 200
            }
        );
    }

    #[test]
    fn test_sniff_jpeg_and_gif() {
        let jpeg = encode_jpeg(64, 48);
        let info = sniff_format(Cursor::new(&jpeg[..])).unwrap();
        assert_eq!(info.kind, ImageKind::Jpeg);
        assert_eq!((info.width, info.height), (64, 48));

        let gif = encode_rgba(10, 20, ImageFormat::Gif);
        let info = sniff_format(Cursor::new(&gif[..])).unwrap();
        assert_eq!(info.kind, ImageKind::Gif);
        assert_eq!((info.width, info.height), (10, 20));
    }

    #[test]
    fn test_sniff_is_repeatable() {
        let data = encode_rgba(33, 7, ImageFormat::Png);
        let first = sniff_format(Cursor::new(&data[..])).unwrap();
        let second = sniff_format(Cursor::new(&data[..])).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sniff_rejects_garbage() {
        let result = sniff_format(Cursor::new(&b"not an image"[..]));
        assert!(matches!(result, Err(DecodeError::UnsupportedOrCorrupt(_))));

        let result = sniff_format(Cursor::new(&b""[..]));
        assert!(matches!(result, Err(DecodeError::UnsupportedOrCorrupt(_))));
    }

    #[test]
    fn test_sniff_rejects_unsupported_format() {
        // BMP magic is recognised but not part of the accepted set
        let mut bmp = b"BM".to_vec();
        bmp.extend_from_slice(&[0u8; 64]);
        let result = sniff_format(Cursor::new(&bmp[..]));
        assert!(matches!(result, Err(DecodeError::UnsupportedOrCorrupt(_))));
    }

    #[test]
    fn test_extension_matching() {
        assert!(ImageKind::Jpeg.matches_extension(".jpg"));
        assert!(ImageKind::Jpeg.matches_extension(".JPEG"));
        assert!(ImageKind::Png.matches_extension("png"));
        assert!(!ImageKind::Png.matches_extension(".jpg"));
        assert_eq!(ImageKind::from_extension(".webp"), Some(ImageKind::WebP));
        assert_eq!(ImageKind::from_extension(".svg"), None);
    }
}
