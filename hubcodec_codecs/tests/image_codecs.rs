//! PNG / JPEG / WebP: shape rules, batches, and what each format can hold.
use hubcodec_codecs::{JpegCodec, PngCodec, WebPCodec};
use hubcodec_core::format::BATCH_MAGIC;
use hubcodec_core::{Array, BatchFrame, Codec, CodecError, DType, JpegConfig, PngConfig};
use test_log::test;

fn test_image(shape: &[usize]) -> Array {
    let len: usize = shape.iter().product();
    let pixels = (0..len).map(|i| ((i * 7) % 256) as u8).collect();
    Array::new(DType::U8, shape.to_vec(), pixels).unwrap()
}

fn png(single_channel: bool) -> PngCodec {
    PngCodec::new(PngConfig { single_channel }).unwrap()
}

fn jpeg(quality: i32, single_channel: bool) -> JpegCodec {
    JpegCodec::new(JpegConfig {
        quality,
        single_channel,
    })
    .unwrap()
}

fn round_trip(codec: &dyn Codec, array: &Array) -> Array {
    let encoded = codec.compress(array).unwrap();
    codec.decompress(&encoded).unwrap()
}

#[test]
fn png_is_lossless_for_every_channel_count() {
    for channels in 1..=4 {
        let image = test_image(&[9, 13, channels]);
        assert_eq!(round_trip(&png(true), &image), image, "{channels} channels");
    }
    let plain_gray = test_image(&[9, 13]);
    assert_eq!(round_trip(&png(false), &plain_gray), plain_gray);
}

#[test]
fn single_images_are_standalone_files() {
    let encoded = png(true).compress(&test_image(&[4, 4, 3])).unwrap();
    assert!(encoded.starts_with(b"\x89PNG\r\n\x1a\n"));

    let encoded = jpeg(80, true).compress(&test_image(&[16, 16, 3])).unwrap();
    assert!(encoded.starts_with(&[0xFF, 0xD8]));

    let encoded = WebPCodec.compress(&test_image(&[4, 4, 4])).unwrap();
    assert!(encoded.starts_with(b"RIFF"));
    assert_eq!(&encoded[8..12], b"WEBP");

    let decoded = image::load_from_memory(&png(true).compress(&test_image(&[5, 7, 1])).unwrap())
        .unwrap();
    assert_eq!((decoded.width(), decoded.height()), (7, 5));
}

#[test]
fn single_channel_decides_how_grayscale_is_shaped() {
    // single_channel = true: grayscale is (H, W, 1)
    assert!(matches!(
        png(true).compress(&test_image(&[8, 8])),
        Err(CodecError::InvalidShape { codec: "png", .. })
    ));
    // single_channel = false: grayscale is (H, W)
    assert!(matches!(
        png(false).compress(&test_image(&[8, 8, 1])),
        Err(CodecError::InvalidShape { codec: "png", .. })
    ));
    // no effect on colour images
    let rgb = test_image(&[6, 6, 3]);
    assert_eq!(round_trip(&png(false), &rgb), rgb);
    assert_eq!(round_trip(&png(true), &rgb), rgb);
}

#[test]
fn jpeg_keeps_shape_and_dtype() {
    for (shape, single_channel) in [
        (vec![16, 24, 1], true),
        (vec![16, 24], false),
        (vec![17, 9, 3], true),
        (vec![17, 9, 3], false),
    ] {
        let image = test_image(&shape);
        let decoded = round_trip(&jpeg(50, single_channel), &image);
        assert_eq!(decoded.shape(), image.shape());
        assert_eq!(decoded.dtype(), DType::U8);
    }
}

#[test]
fn jpeg_rejects_alpha() {
    for channels in [2, 4] {
        assert!(matches!(
            jpeg(90, true).compress(&test_image(&[8, 8, channels])),
            Err(CodecError::InvalidShape { codec: "jpeg", .. })
        ));
    }
}

#[test]
fn webp_is_lossless_for_rgb_and_rgba() {
    for channels in [3, 4] {
        let image = test_image(&[10, 12, channels]);
        assert_eq!(round_trip(&WebPCodec, &image), image, "{channels} channels");
    }
    for shape in [vec![10, 12], vec![10, 12, 1], vec![10, 12, 2]] {
        assert!(matches!(
            WebPCodec.compress(&test_image(&shape)),
            Err(CodecError::InvalidShape { codec: "webp", .. })
        ));
    }
}

#[test]
fn only_u8_pixels_are_accepted() {
    let wide = Array::zeros(DType::U16, vec![4, 4, 3]).unwrap();
    let codecs: [&dyn Codec; 3] = [&png(true), &jpeg(90, true), &WebPCodec];
    for codec in codecs {
        assert!(matches!(
            codec.compress(&wide),
            Err(CodecError::UnsupportedDtype { .. })
        ));
    }
}

#[test]
fn vectors_and_empty_images_are_rejected() {
    for shape in [vec![16], vec![0, 4, 3], vec![4, 0, 3]] {
        assert!(matches!(
            png(false).compress(&test_image(&shape)),
            Err(CodecError::InvalidShape { .. })
        ));
    }
}

#[test]
fn batches_round_trip_through_a_frame() {
    let batch = test_image(&[2, 3, 8, 8, 3]);
    let encoded = png(true).compress(&batch).unwrap();
    assert!(encoded.starts_with(BATCH_MAGIC));
    assert_eq!(png(true).decompress(&encoded).unwrap(), batch);

    let batch = test_image(&[4, 16, 16, 1]);
    let decoded = round_trip(&jpeg(60, true), &batch);
    assert_eq!(decoded.shape(), &[4, 16, 16, 1]);

    let batch = test_image(&[3, 5, 5, 4]);
    assert_eq!(round_trip(&WebPCodec, &batch), batch);
}

#[test]
fn empty_batches_round_trip() {
    let empty = Array::zeros(DType::U8, vec![0, 8, 8, 3]).unwrap();
    assert_eq!(round_trip(&png(true), &empty), empty);
}

#[test]
fn garbage_is_a_decode_error() {
    let codecs: [&dyn Codec; 3] = [&png(true), &jpeg(90, true), &WebPCodec];
    for codec in codecs {
        assert!(matches!(
            codec.decompress(b"not an image at all"),
            Err(CodecError::Decode { .. })
        ));
    }

    let mut batch = png(true).compress(&test_image(&[2, 4, 4, 3])).unwrap();
    batch.truncate(batch.len() - 3);
    assert!(matches!(
        png(true).decompress(&batch),
        Err(CodecError::Decode { codec: "png", .. })
    ));
}

#[test]
fn oversized_batch_header_is_a_decode_error() {
    let header = BatchFrame {
        shape: vec![usize::MAX / 8, 16, 4, 4, 3],
        items: vec![],
    }
    .to_bytes("png")
    .unwrap();
    assert!(matches!(
        png(true).decompress(&header),
        Err(CodecError::Decode { codec: "png", .. })
    ));

    let header = BatchFrame {
        shape: vec![0, u32::MAX as usize, u32::MAX as usize, 4],
        items: vec![],
    }
    .to_bytes("png")
    .unwrap();
    assert!(matches!(
        png(true).decompress(&header),
        Err(CodecError::Decode { codec: "png", .. })
    ));
}

#[test]
fn batch_with_too_many_dimensions_fails_to_encode() {
    let mut shape = vec![1; 253];
    shape.extend([4, 4, 3]);
    assert!(matches!(
        png(true).compress(&test_image(&shape)),
        Err(CodecError::Encode { codec: "png", .. })
    ));

    let mut shape = vec![1; 252];
    shape.extend([4, 4, 3]);
    let image = test_image(&shape);
    assert_eq!(round_trip(&png(true), &image), image);
}

#[test]
fn png_batch_is_not_readable_as_webp() {
    let batch = png(true).compress(&test_image(&[2, 4, 4, 3])).unwrap();
    assert!(matches!(
        WebPCodec.decompress(&batch),
        Err(CodecError::Decode { codec: "webp", .. })
    ));
}
