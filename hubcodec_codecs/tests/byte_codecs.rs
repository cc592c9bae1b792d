//! LZ4 and Zstd: lossless on raw byte buffers and on arrays of every dtype.
use hubcodec_codecs::{Lz4Codec, ZstdCodec};
use hubcodec_core::{Array, ByteCodec, Codec, CodecError, DType, Lz4Config, ZstdConfig};
use proptest::prelude::*;

/// Generate `len` deterministic bytes using a simple LCG.
fn pseudo_random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = seed;
    (0..len)
        .map(|_| {
            rng = rng
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (rng >> 56) as u8
        })
        .collect()
}

fn byte_codecs() -> Vec<Box<dyn ByteCodec>> {
    vec![
        Box::new(Lz4Codec::default()),
        Box::new(Lz4Codec::new(Lz4Config { acceleration: 16 }).unwrap()),
        Box::new(ZstdCodec::default()),
        Box::new(ZstdCodec::new(ZstdConfig { level: 19 }).unwrap()),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn zstd_is_lossless_for_any_bytes(
        data in proptest::collection::vec(any::<u8>(), 0..8192),
        level in 1i32..=22,
    ) {
        let codec = ZstdCodec::new(ZstdConfig { level }).unwrap();
        let compressed = codec.compress_bytes(&data).unwrap();
        prop_assert_eq!(codec.decompress_bytes(&compressed).unwrap(), data);
    }

    #[test]
    fn lz4_is_lossless_for_any_bytes(
        data in proptest::collection::vec(any::<u8>(), 0..8192),
        acceleration in 1i32..=128,
    ) {
        let codec = Lz4Codec::new(Lz4Config { acceleration }).unwrap();
        let compressed = codec.compress_bytes(&data).unwrap();
        prop_assert_eq!(codec.decompress_bytes(&compressed).unwrap(), data);
    }
}

#[test]
fn empty_input_round_trips() {
    for codec in byte_codecs() {
        let compressed = codec.compress_bytes(&[]).unwrap();
        assert!(codec.decompress_bytes(&compressed).unwrap().is_empty(), "{}", codec.name());
    }
}

#[test]
fn lz4_output_carries_the_raw_length() {
    let data = pseudo_random_bytes(1000, 7);
    let compressed = Lz4Codec::default().compress_bytes(&data).unwrap();
    assert_eq!(&compressed[..4], &1000u32.to_le_bytes());
}

#[test]
fn lz4_rejects_an_impossible_size_prefix() {
    let lz4 = Lz4Codec::default();
    let mut claims_2gib = (i32::MAX).to_le_bytes().to_vec();
    claims_2gib.push(0);
    assert!(matches!(
        lz4.decompress_bytes(&claims_2gib),
        Err(CodecError::Decode { codec: "lz4", .. })
    ));

    let mut negative = (-1i32).to_le_bytes().to_vec();
    negative.extend_from_slice(&[0; 16]);
    assert!(lz4.decompress_bytes(&negative).is_err());

    // Highly repetitive input still fits under the bound.
    let zeros = vec![0u8; 1 << 20];
    let compressed = lz4.compress_bytes(&zeros).unwrap();
    assert_eq!(lz4.decompress_bytes(&compressed).unwrap(), zeros);
}

#[test]
fn arrays_keep_dtype_and_shape() {
    for codec in byte_codecs() {
        for dtype in DType::ALL {
            let shape = vec![3, 5, 2];
            let len = 30 * dtype.itemsize();
            let array = Array::new(dtype, shape, pseudo_random_bytes(len, len as u64)).unwrap();
            let compressed = codec.compress(&array).unwrap();
            assert_eq!(codec.decompress(&compressed).unwrap(), array, "{} {dtype}", codec.name());
        }
    }
}

#[test]
fn corrupt_input_is_a_decode_error() {
    let lz4 = Lz4Codec::default();
    assert!(matches!(
        lz4.decompress_bytes(&[1, 2, 3]),
        Err(CodecError::Decode { codec: "lz4", .. })
    ));

    let zstd = ZstdCodec::default();
    assert!(matches!(
        zstd.decompress_bytes(b"definitely not a zstd frame"),
        Err(CodecError::Decode { codec: "zstd", .. })
    ));

    // Valid compression of something that is not an .npy payload.
    let not_npy = zstd.compress_bytes(b"plain text").unwrap();
    assert!(matches!(
        zstd.decompress(&not_npy),
        Err(CodecError::Decode { codec: "zstd", .. })
    ));
}
