//! Array <-> image plumbing shared by the PNG, JPEG and WebP codecs.
//!
//! An array is either one image, `(H, W)` or `(H, W, C)`, or a batch of
//! `(H, W, C)` images over any number of leading axes. Single images are
//! written as a plain image file; batches go into a [`BatchFrame`].

use std::borrow::Cow;

use hubcodec_core::{Array, BatchFrame, CodecError, DType, Result};
use image::{DynamicImage, ExtendedColorType, GenericImageView};

/// One image, borrowed out of an array.
pub(crate) struct RawImage<'a> {
    pub pixels: &'a [u8],
    pub width: u32,
    pub height: u32,
    pub color: ExtendedColorType,
}

/// Format-specific half of an image codec.
pub(crate) trait ImageFormatCodec {
    const NAME: &'static str;

    /// Channel counts accepted in the trailing axis. Grayscale (1) is still
    /// subject to the `single_channel` rules below.
    const CHANNELS: &'static [usize];

    /// Whether grayscale images keep a trailing size-1 axis.
    fn single_channel(&self) -> bool;

    fn encode_image(&self, image: RawImage<'_>) -> Result<Vec<u8>>;

    fn decode_image(&self, encoded: &[u8]) -> Result<DynamicImage>;
}

/// Dimensions of each image inside an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Geometry {
    height: usize,
    width: usize,
    channels: usize,
}

impl Geometry {
    /// Only called on geometry that passed [`layout`], which checks this
    /// product fits.
    fn pixel_bytes(&self) -> usize {
        self.height * self.width * self.channels
    }

    fn color(&self) -> ExtendedColorType {
        match self.channels {
            1 => ExtendedColorType::L8,
            2 => ExtendedColorType::La8,
            3 => ExtendedColorType::Rgb8,
            _ => ExtendedColorType::Rgba8,
        }
    }

    /// Array shape of one decoded image.
    fn shape(&self, single_channel: bool) -> Vec<usize> {
        if self.channels == 1 && !single_channel {
            vec![self.height, self.width]
        } else {
            vec![self.height, self.width, self.channels]
        }
    }
}

fn invalid_shape<C: ImageFormatCodec>(shape: &[usize], reason: impl Into<Cow<'static, str>>) -> CodecError {
    CodecError::InvalidShape {
        codec: C::NAME,
        shape: shape.to_vec(),
        reason: reason.into(),
    }
}

/// Work out the per-image geometry and how many images `shape` holds.
fn layout<C: ImageFormatCodec>(codec: &C, shape: &[usize]) -> Result<(Geometry, usize)> {
    let (image_dims, batch_dims) = match shape.len() {
        0 | 1 => {
            return Err(invalid_shape::<C>(shape, "an image needs at least 2 dimensions"));
        }
        2 => (shape, &[][..]),
        n => (&shape[n - 3..], &shape[..n - 3]),
    };

    let geometry = match *image_dims {
        [height, width] => {
            if codec.single_channel() {
                return Err(invalid_shape::<C>(
                    shape,
                    "single_channel expects grayscale images as (H, W, 1)",
                ));
            }
            Geometry { height, width, channels: 1 }
        }
        [height, width, channels] => {
            if channels == 1 && !codec.single_channel() {
                return Err(invalid_shape::<C>(
                    shape,
                    "a trailing size-1 axis needs single_channel = true",
                ));
            }
            Geometry { height, width, channels }
        }
        _ => unreachable!("image_dims has 2 or 3 entries"),
    };

    if !C::CHANNELS.contains(&geometry.channels) {
        return Err(invalid_shape::<C>(
            shape,
            format!("{} channels not supported, expected one of {:?}", geometry.channels, C::CHANNELS),
        ));
    }
    if geometry.height == 0 || geometry.width == 0 {
        return Err(invalid_shape::<C>(shape, "images must not be empty"));
    }
    if u32::try_from(geometry.height).is_err() || u32::try_from(geometry.width).is_err() {
        return Err(invalid_shape::<C>(shape, "image dimensions exceed u32"));
    }

    // Batch headers are untrusted on decode.
    let pixel_bytes = geometry
        .height
        .checked_mul(geometry.width)
        .and_then(|px| px.checked_mul(geometry.channels));
    let count = batch_dims
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .filter(|&count| pixel_bytes.and_then(|px| px.checked_mul(count)).is_some())
        .ok_or_else(|| invalid_shape::<C>(shape, "shape is too large to address"))?;

    Ok((geometry, count))
}

fn encode_one<C: ImageFormatCodec>(codec: &C, geometry: Geometry, pixels: &[u8]) -> Result<Vec<u8>> {
    codec.encode_image(RawImage {
        pixels,
        width: geometry.width as u32,
        height: geometry.height as u32,
        color: geometry.color(),
    })
}

/// Split a decoded image into raw `u8` pixels and its geometry.
fn into_pixels(image: DynamicImage) -> (Vec<u8>, Geometry) {
    let (width, height) = image.dimensions();
    let (width, height) = (width as usize, height as usize);
    let (pixels, channels) = match image {
        DynamicImage::ImageLuma8(buf) => (buf.into_raw(), 1),
        DynamicImage::ImageLumaA8(buf) => (buf.into_raw(), 2),
        DynamicImage::ImageRgb8(buf) => (buf.into_raw(), 3),
        DynamicImage::ImageRgba8(buf) => (buf.into_raw(), 4),
        other if other.color().has_alpha() => (other.to_rgba8().into_raw(), 4),
        other => (other.to_rgb8().into_raw(), 3),
    };
    (pixels, Geometry { height, width, channels })
}

pub(crate) fn compress_images<C: ImageFormatCodec>(codec: &C, data: &Array) -> Result<Vec<u8>> {
    if data.dtype() != DType::U8 {
        return Err(CodecError::UnsupportedDtype {
            codec: C::NAME,
            dtype: data.dtype().to_string(),
        });
    }
    let (geometry, count) = layout(codec, data.shape())?;

    if data.ndim() <= 3 {
        let encoded = encode_one(codec, geometry, data.as_bytes())?;
        log::trace!(
            "{} encoded {}x{}x{} image into {} bytes",
            C::NAME,
            geometry.height,
            geometry.width,
            geometry.channels,
            encoded.len()
        );
        return Ok(encoded);
    }

    let items = data
        .as_bytes()
        .chunks_exact(geometry.pixel_bytes())
        .map(|pixels| encode_one(codec, geometry, pixels))
        .collect::<Result<Vec<_>>>()?;
    debug_assert_eq!(items.len(), count);
    log::trace!("{} encoded batch of {} images", C::NAME, items.len());

    BatchFrame {
        shape: data.shape().to_vec(),
        items,
    }
    .to_bytes(C::NAME)
}

pub(crate) fn decompress_images<C: ImageFormatCodec>(codec: &C, encoded: &[u8]) -> Result<Array> {
    if !BatchFrame::is_batch(encoded) {
        let (pixels, geometry) = into_pixels(codec.decode_image(encoded)?);
        if !C::CHANNELS.contains(&geometry.channels) {
            return Err(CodecError::decode(
                C::NAME,
                format!("decoded image has unsupported channel count {}", geometry.channels),
            ));
        }
        return Array::new(DType::U8, geometry.shape(codec.single_channel()), pixels);
    }

    let frame = BatchFrame::from_bytes(encoded, C::NAME)?;
    if frame.shape.len() < 4 {
        return Err(CodecError::decode(
            C::NAME,
            format!("batch shape {:?} has fewer than 4 dimensions", frame.shape),
        ));
    }
    let (expected, count) = layout(codec, &frame.shape)
        .map_err(|err| CodecError::decode(C::NAME, format!("invalid batch header: {err}")))?;
    if frame.items.len() != count {
        return Err(CodecError::decode(
            C::NAME,
            format!("batch shape {:?} needs {count} images, found {}", frame.shape, frame.items.len()),
        ));
    }

    let mut data = Vec::new();
    for (i, item) in frame.items.iter().enumerate() {
        let (pixels, geometry) = into_pixels(codec.decode_image(item)?);
        if geometry != expected {
            return Err(CodecError::decode(
                C::NAME,
                format!("batch image {i} decoded as {geometry:?}, expected {expected:?}"),
            ));
        }
        data.extend_from_slice(&pixels);
    }
    Array::new(DType::U8, frame.shape, data)
}

/// Map an image library failure to a codec error.
pub(crate) fn encode_err(codec: &'static str, err: image::ImageError) -> CodecError {
    CodecError::encode(codec, err.to_string())
}

pub(crate) fn decode_err(codec: &'static str, err: image::ImageError) -> CodecError {
    CodecError::decode(codec, err.to_string())
}
