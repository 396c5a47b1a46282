use crate::domain::detection::entity::ImageSource;
use base64::{Engine, engine::general_purpose::STANDARD};
use image::{DynamicImage, ImageFormat, ImageReader, Limits};
use std::io::Cursor;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum ImagingError {
    #[error("Invalid base64 image: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("Image worker failed: {0}")]
    Worker(String),
}

/// Upper bound on memory a single decode may allocate.
pub const MAX_DECODE_ALLOC: u64 = 128 * 1024 * 1024;
const MAX_DIMENSION: u32 = 16_384;

/// Image ready to be shipped to a provider: PNG bytes, base64 encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedImage {
    pub base64_png: String,
    pub width: u32,
    pub height: u32,
}

/// Decodes whatever the caller sent and re-encodes it as PNG.
///
/// Only pixels survive the round trip: EXIF and other metadata are dropped
/// and animated GIF/WebP inputs are reduced to their first frame.
pub struct ImageNormalizer;

impl ImageNormalizer {
    /// Runs decoding and encoding on the blocking pool.
    #[instrument(skip(source), fields(source = source.kind(), size = source.len()))]
    pub async fn normalize(source: ImageSource) -> Result<NormalizedImage, ImagingError> {
        tokio::task::spawn_blocking(move || Self::normalize_blocking(&source))
            .await
            .map_err(|e| ImagingError::Worker(e.to_string()))?
    }

    pub fn normalize_blocking(source: &ImageSource) -> Result<NormalizedImage, ImagingError> {
        let image = Self::decode(source)?;
        let normalized = Self::encode_png(image)?;
        debug!(
            width = normalized.width,
            height = normalized.height,
            encoded_len = normalized.base64_png.len(),
            "image normalized to png"
        );
        Ok(normalized)
    }

    /// Pixel buffer for an image source.
    pub fn decode(source: &ImageSource) -> Result<DynamicImage, ImagingError> {
        Self::decode_with_limits(source, decode_limits())
    }

    fn decode_with_limits(source: &ImageSource, limits: Limits) -> Result<DynamicImage, ImagingError> {
        match source {
            ImageSource::UploadedFile { bytes, .. } => decode_bytes(bytes, limits),
            ImageSource::InlineBase64 { data } => {
                let raw = STANDARD.decode(data.as_bytes())?;
                decode_bytes(&raw, limits)
            }
        }
    }

    pub fn encode_png(image: DynamicImage) -> Result<NormalizedImage, ImagingError> {
        let image = png_compatible(image);
        let (width, height) = (image.width(), image.height());

        let mut buf = Cursor::new(Vec::new());
        image.write_to(&mut buf, ImageFormat::Png)?;

        Ok(NormalizedImage {
            base64_png: STANDARD.encode(buf.into_inner()),
            width,
            height,
        })
    }
}

fn decode_limits() -> Limits {
    let mut limits = Limits::default();
    limits.max_alloc = Some(MAX_DECODE_ALLOC);
    limits.max_image_width = Some(MAX_DIMENSION);
    limits.max_image_height = Some(MAX_DIMENSION);
    limits
}

fn decode_bytes(bytes: &[u8], limits: Limits) -> Result<DynamicImage, ImagingError> {
    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(image::ImageError::IoError)?;
    reader.limits(limits);
    Ok(reader.decode()?)
}

// PNG has no float sample type; TIFF can still hand us one.
fn png_compatible(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageRgb32F(_) => DynamicImage::ImageRgb16(image.to_rgb16()),
        DynamicImage::ImageRgba32F(_) => DynamicImage::ImageRgba16(image.to_rgba16()),
        other => other,
    }
}
