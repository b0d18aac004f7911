use crate::domain::shared::errors::DomainError;
use image::{
    codecs::jpeg::JpegEncoder, imageops::FilterType, metadata::Orientation, DynamicImage,
    ExtendedColorType, ImageDecoder, ImageEncoder, ImageFormat, ImageReader,
};
use std::io::Cursor;
use thiserror::Error;
use tracing::{debug, instrument};

pub const DISPLAY_MAX_EDGE: u32 = 1920;
pub const DISPLAY_JPEG_QUALITY: u8 = 82;
pub const THUMB_MAX_EDGE: u32 = 480;
pub const THUMB_JPEG_QUALITY: u8 = 80;
pub const OUTPUT_MIME: &str = "image/jpeg";

/// ISO-BMFF major/compatible brands that identify a HEIF still image.
const HEIF_BRANDS: &[&[u8; 4]] = &[
    b"heic", b"heix", b"hevc", b"hevx", b"heim", b"heis", b"mif1", b"msf1",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
    WebP,
    Heif,
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("unrecognized image format")]
    UnknownFormat,
    #[error("image format {0:?} is not accepted")]
    Rejected(ImageFormat),
    #[error("HEIC/HEIF decoding is not available in this build")]
    HeifUnavailable,
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("encode failed: {0}")]
    Encode(#[from] image::ImageError),
}

impl From<NormalizeError> for DomainError {
    fn from(err: NormalizeError) -> Self {
        DomainError::UnsupportedMediaType(match err {
            NormalizeError::HeifUnavailable => "HEIC images are not supported".to_string(),
            _ => "Could not read image. Use JPEG, PNG, WebP or HEIC.".to_string(),
        })
    }
}

/// Upright, stripped JPEG variants of one upload.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub display: Vec<u8>,
    pub thumbnail: Vec<u8>,
    /// Dimensions of the display variant
    pub width: u32,
    pub height: u32,
    pub mime: &'static str,
}

/// Identifies the real container format from magic bytes.
pub fn sniff_format(bytes: &[u8]) -> Result<SourceFormat, NormalizeError> {
    if is_heif(bytes) {
        return Ok(SourceFormat::Heif);
    }
    match image::guess_format(bytes) {
        Ok(ImageFormat::Jpeg) => Ok(SourceFormat::Jpeg),
        Ok(ImageFormat::Png) => Ok(SourceFormat::Png),
        Ok(ImageFormat::WebP) => Ok(SourceFormat::WebP),
        Ok(other) => Err(NormalizeError::Rejected(other)),
        Err(_) => Err(NormalizeError::UnknownFormat),
    }
}

fn is_heif(bytes: &[u8]) -> bool {
    if bytes.len() < 12 || &bytes[4..8] != b"ftyp" {
        return false;
    }
    let box_len = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
    let end = box_len.clamp(12, bytes.len());
    // major brand, then (after minor_version) the compatible brands
    std::iter::once(&bytes[8..12])
        .chain(bytes[16.min(end)..end].chunks_exact(4))
        .any(|brand| HEIF_BRANDS.iter().any(|b| &b[..] == brand))
}

/// Decodes, re-orients and re-encodes an upload into display and thumbnail JPEGs.
///
/// CPU bound; callers on the async runtime should run it on a blocking thread.
#[instrument(skip(bytes), fields(input_size = bytes.len()))]
pub fn normalize(bytes: &[u8]) -> Result<NormalizedImage, NormalizeError> {
    let format = sniff_format(bytes)?;
    let upright = match format {
        SourceFormat::Heif => decode_heif(bytes)?,
        SourceFormat::Jpeg => decode_oriented(bytes, ImageFormat::Jpeg)?,
        SourceFormat::Png => decode_oriented(bytes, ImageFormat::Png)?,
        SourceFormat::WebP => decode_oriented(bytes, ImageFormat::WebP)?,
    };
    debug!(
        ?format,
        width = upright.width(),
        height = upright.height(),
        "Decoded upload"
    );

    let display = fit_within(upright, DISPLAY_MAX_EDGE);
    let thumb = fit_within(display.clone(), THUMB_MAX_EDGE);

    let (width, height) = (display.width(), display.height());
    let display_bytes = encode_jpeg(&display, DISPLAY_JPEG_QUALITY)?;
    let thumb_bytes = encode_jpeg(&thumb, THUMB_JPEG_QUALITY)?;

    debug!(
        width,
        height,
        display_size = display_bytes.len(),
        thumb_size = thumb_bytes.len(),
        "Normalized upload"
    );

    Ok(NormalizedImage {
        display: display_bytes,
        thumbnail: thumb_bytes,
        width,
        height,
        mime: OUTPUT_MIME,
    })
}

fn decode_oriented(bytes: &[u8], format: ImageFormat) -> Result<DynamicImage, NormalizeError> {
    let mut decoder = ImageReader::with_format(Cursor::new(bytes), format)
        .into_decoder()
        .map_err(|e| NormalizeError::Decode(e.to_string()))?;
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    let mut img =
        DynamicImage::from_decoder(decoder).map_err(|e| NormalizeError::Decode(e.to_string()))?;
    img.apply_orientation(orientation);
    Ok(img)
}

/// Downscales so neither edge exceeds `max_edge`. Never upscales.
fn fit_within(img: DynamicImage, max_edge: u32) -> DynamicImage {
    if img.width() <= max_edge && img.height() <= max_edge {
        return img;
    }
    img.resize(max_edge, max_edge, FilterType::Lanczos3)
}

/// Fresh baseline JPEG. Nothing from the source container (EXIF,
/// orientation, ICC) is carried over.
fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, NormalizeError> {
    let rgb = img.to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality).write_image(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(out)
}

#[cfg(feature = "heic")]
fn decode_heif(bytes: &[u8]) -> Result<DynamicImage, NormalizeError> {
    use image::RgbImage;
    use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

    let lib = LibHeif::new();
    let ctx = HeifContext::read_from_bytes(bytes).map_err(|e| NormalizeError::Decode(e.to_string()))?;
    let handle = ctx
        .primary_image_handle()
        .map_err(|e| NormalizeError::Decode(e.to_string()))?;
    // libheif applies irot/imir transforms while decoding
    let decoded = lib
        .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)
        .map_err(|e| NormalizeError::Decode(e.to_string()))?;
    let plane = decoded
        .planes()
        .interleaved
        .ok_or_else(|| NormalizeError::Decode("missing interleaved RGB plane".into()))?;

    let (width, height) = (plane.width, plane.height);
    let row_len = width as usize * 3;
    let mut pixels = Vec::with_capacity(row_len * height as usize);
    for row in plane.data.chunks(plane.stride).take(height as usize) {
        pixels.extend_from_slice(&row[..row_len]);
    }
    RgbImage::from_raw(width, height, pixels)
        .map(DynamicImage::ImageRgb8)
        .ok_or_else(|| NormalizeError::Decode("truncated HEIF pixel data".into()))
}

#[cfg(not(feature = "heic"))]
fn decode_heif(_bytes: &[u8]) -> Result<DynamicImage, NormalizeError> {
    Err(NormalizeError::HeifUnavailable)
}
