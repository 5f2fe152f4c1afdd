//! Image conversion routine.
//!
//! Given the raw bytes of a source object, its metadata, and the variant's
//! `ConvertConfig`, produces re-encoded bytes, the destination key, and the
//! output content type. Steps run in a fixed order: decode, shrink-to-fit
//! (never upscaling), output codec selection, alpha flattening for codecs
//! without alpha support, encode.

use std::io::Cursor;

use bytes::Bytes;
use image::{DynamicImage, GenericImageView, ImageError, ImageFormat};
use thiserror::Error;

use picflow_core::{destination_key, ConvertConfig, Format, ObjectMetadata};

/// Conversion failures. Both variants are permanent: retrying the same bytes
/// with the same config cannot succeed.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to decode source image: {0}")]
    Decode(#[source] ImageError),

    #[error("failed to encode image as {format}: {source}")]
    Encode {
        format: &'static str,
        #[source]
        source: ImageError,
    },
}

/// Result of a conversion: encoded bytes plus where and how to store them.
#[derive(Debug)]
pub struct ConvertOutput {
    pub data: Bytes,
    pub key: String,
    pub content_type: String,
}

/// Convert `source` according to `config`.
///
/// The destination key uses the configured format and resize segments (the
/// literal `original` when unset), the source object's `userid`/`imageid`
/// metadata, and a freshly generated id only when `imageid` is absent.
pub fn convert(
    source: &[u8],
    metadata: &ObjectMetadata,
    config: &ConvertConfig,
) -> Result<ConvertOutput, ConvertError> {
    let reader = image::ImageReader::new(Cursor::new(source))
        .with_guessed_format()
        .map_err(|e| ConvertError::Decode(ImageError::IoError(e)))?;

    let source_format = reader.format();
    let mut img = reader.decode().map_err(ConvertError::Decode)?;

    if let Some(max) = config.resize {
        img = shrink_to_fit(img, max);
    }

    let (target, content_type) = match (config.format, source_format) {
        (Some(format), _) => (image_format(format), format.content_type()),
        // with_guessed_format succeeded and decode succeeded, so the source
        // format is known here; the fallback is unreachable in practice.
        (None, Some(format)) => (format, format.to_mime_type().to_string()),
        (None, None) => (ImageFormat::Png, ImageFormat::Png.to_mime_type().to_string()),
    };

    // JPEG cannot represent an alpha channel; flatten before encoding.
    if target == ImageFormat::Jpeg && img.color().has_alpha() {
        img = DynamicImage::ImageRgb8(img.to_rgb8());
    }

    let (width, height) = img.dimensions();
    let estimated_size = (width * height * 3) as usize;
    let mut buffer = Vec::with_capacity(estimated_size);
    img.write_to(&mut Cursor::new(&mut buffer), target)
        .map_err(|e| ConvertError::Encode {
            format: target.to_mime_type(),
            source: e,
        })?;

    let key = destination_key(config.format, config.resize, metadata);

    tracing::debug!(
        key = %key,
        content_type = %content_type,
        width = width,
        height = height,
        size_bytes = buffer.len(),
        "Image converted"
    );

    Ok(ConvertOutput {
        data: Bytes::from(buffer),
        key,
        content_type,
    })
}

/// Shrink so neither dimension exceeds `max`, preserving aspect ratio.
/// Images already within bounds are returned untouched; upscaling never
/// happens.
fn shrink_to_fit(img: DynamicImage, max: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    if width <= max && height <= max {
        return img;
    }

    let filter = select_filter(width.max(height), max);
    img.resize(max, max, filter)
}

/// Pick a resampling filter by shrink ratio: cheaper filters for aggressive
/// downscales, Lanczos for gentle ones.
fn select_filter(orig_max: u32, target_max: u32) -> image::imageops::FilterType {
    let ratio = orig_max as f32 / target_max as f32;
    if ratio > 2.0 {
        image::imageops::FilterType::Triangle
    } else if ratio > 1.5 {
        image::imageops::FilterType::CatmullRom
    } else {
        image::imageops::FilterType::Lanczos3
    }
}

fn image_format(format: Format) -> ImageFormat {
    match format {
        Format::Jpeg => ImageFormat::Jpeg,
        Format::Webp => ImageFormat::WebP,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use picflow_core::ObjectMetadata;
    use uuid::Uuid;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([10, 20, 30, 255]),
        ));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([10, 20, 30])));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)
            .unwrap();
        buffer
    }

    fn config(format: Option<Format>, resize: Option<u32>) -> ConvertConfig {
        ConvertConfig {
            output_bucket: "output".to_string(),
            format,
            resize,
        }
    }

    fn tagged_metadata() -> ObjectMetadata {
        let mut metadata = ObjectMetadata::new();
        metadata.insert("userid", "u1");
        metadata.insert("imageid", "img1");
        metadata
    }

    #[test]
    fn test_output_decodable_as_target_codec() {
        let output = convert(
            &png_bytes(64, 64),
            &tagged_metadata(),
            &config(Some(Format::Webp), None),
        )
        .unwrap();
        assert_eq!(
            image::guess_format(&output.data).unwrap(),
            ImageFormat::WebP
        );
    }

    #[test]
    fn test_rgba_source_encodes_as_jpeg() {
        // PNG with alpha must be flattened before JPEG encoding
        let output = convert(
            &png_bytes(64, 64),
            &tagged_metadata(),
            &config(Some(Format::Jpeg), None),
        )
        .unwrap();
        assert_eq!(
            image::guess_format(&output.data).unwrap(),
            ImageFormat::Jpeg
        );
        assert_eq!(output.content_type, "image/jpeg");
    }

    #[test]
    fn test_passthrough_keeps_source_codec() {
        let output = convert(&png_bytes(64, 64), &tagged_metadata(), &config(None, None)).unwrap();
        assert_eq!(image::guess_format(&output.data).unwrap(), ImageFormat::Png);
        assert_eq!(output.content_type, "image/png");
    }

    #[test]
    fn test_resize_shrinks_to_fit() {
        let output = convert(
            &jpeg_bytes(800, 600),
            &tagged_metadata(),
            &config(None, Some(400)),
        )
        .unwrap();
        let img = image::load_from_memory(&output.data).unwrap();
        assert_eq!(img.dimensions(), (400, 300));
    }

    #[test]
    fn test_resize_never_upscales() {
        let output = convert(
            &jpeg_bytes(200, 200),
            &tagged_metadata(),
            &config(None, Some(400)),
        )
        .unwrap();
        let img = image::load_from_memory(&output.data).unwrap();
        assert_eq!(img.dimensions(), (200, 200));
    }

    #[test]
    fn test_no_resize_preserves_dimensions() {
        let output = convert(&png_bytes(123, 77), &tagged_metadata(), &config(None, None)).unwrap();
        let img = image::load_from_memory(&output.data).unwrap();
        assert_eq!(img.dimensions(), (123, 77));
    }

    #[test]
    fn test_key_for_tagged_passthrough() {
        let output = convert(&png_bytes(64, 64), &tagged_metadata(), &config(None, None)).unwrap();
        assert_eq!(output.key, "original/original/u1/img1");
    }

    #[test]
    fn test_webp_400_scenario_with_empty_metadata() {
        // 200x200 input, webp@400: no shrink needed, anonymous key with a
        // generated image id
        let output = convert(
            &jpeg_bytes(200, 200),
            &ObjectMetadata::new(),
            &config(Some(Format::Webp), Some(400)),
        )
        .unwrap();

        let img = image::load_from_memory(&output.data).unwrap();
        assert_eq!(img.dimensions(), (200, 200));
        assert_eq!(output.content_type, "image/webp");

        let segments: Vec<&str> = output.key.split('/').collect();
        assert_eq!(&segments[..3], &["webp", "400", "anonymous"]);
        assert!(Uuid::parse_str(segments[3]).is_ok());
    }

    #[test]
    fn test_undecodable_input_is_decode_error() {
        let err = convert(
            b"definitely not an image",
            &ObjectMetadata::new(),
            &config(None, None),
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::Decode(_)));
    }
}
