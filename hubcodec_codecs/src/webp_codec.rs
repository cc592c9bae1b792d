use hubcodec_core::{Array, Codec, CodecConfig, CodecError, CodecKind, Result};
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ImageEncoder, ImageFormat};

use crate::image_common::{
    compress_images, decode_err, decompress_images, encode_err, ImageFormatCodec, RawImage,
};

/// Lossless WebP codec for 8-bit RGB and RGBA images.
///
/// Grayscale is not accepted: WebP stores it as RGB and the decoder cannot
/// recover the original channel count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WebPCodec;

impl WebPCodec {
    pub const NAME: &'static str = CodecKind::WebP.name();

    pub fn from_config(config: CodecConfig) -> Result<Self> {
        match config {
            CodecConfig::Default | CodecConfig::WebP => Ok(Self),
            other => Err(CodecError::ConfigMismatch {
                codec: Self::NAME,
                config: other.label(),
            }),
        }
    }
}

impl ImageFormatCodec for WebPCodec {
    const NAME: &'static str = WebPCodec::NAME;
    const CHANNELS: &'static [usize] = &[3, 4];

    fn single_channel(&self) -> bool {
        false
    }

    fn encode_image(&self, image: RawImage<'_>) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        WebPEncoder::new_lossless(&mut out)
            .write_image(image.pixels, image.width, image.height, image.color)
            .map_err(|e| encode_err(Self::NAME, e))?;
        Ok(out)
    }

    fn decode_image(&self, encoded: &[u8]) -> Result<DynamicImage> {
        image::load_from_memory_with_format(encoded, ImageFormat::WebP)
            .map_err(|e| decode_err(Self::NAME, e))
    }
}

impl Codec for WebPCodec {
    fn kind(&self) -> CodecKind {
        CodecKind::WebP
    }

    fn compress(&self, data: &Array) -> Result<Vec<u8>> {
        compress_images(self, data)
    }

    fn decompress(&self, compressed: &[u8]) -> Result<Array> {
        decompress_images(self, compressed)
    }
}
