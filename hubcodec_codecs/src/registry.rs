//! Name -> codec lookup.
//!
//! The table is [`CodecKind::ALL`]: a `'static` array, so lookups are
//! lock-free and safe from any thread. The registry matches names exactly and
//! never validates options itself; each variant's constructor does.

use hubcodec_core::{CodecConfig, CodecKind, Result, UnsupportedCodecError};

use crate::{Compressor, JpegCodec, Lz4Codec, NumPyCodec, PngCodec, WebPCodec, ZstdCodec};

/// Construct the codec registered under `name`.
///
/// ```
/// use hubcodec_codecs::get_compressor;
/// use hubcodec_core::{Codec, CodecConfig, Lz4Config};
///
/// let lz4 = get_compressor("lz4", CodecConfig::Lz4(Lz4Config { acceleration: 2 })).unwrap();
/// assert_eq!(lz4.name(), "lz4");
/// ```
///
/// # Errors
/// - [`CodecError::UnsupportedCodec`](hubcodec_core::CodecError::UnsupportedCodec)
///   if `name` is not registered. Matching is case-sensitive.
/// - Whatever the variant's constructor returns for invalid options, unchanged.
pub fn get_compressor(name: &str, config: CodecConfig) -> Result<Compressor> {
    let kind = CodecKind::from_name(name).ok_or_else(|| UnsupportedCodecError {
        name: name.to_string(),
        supported: supported_names(),
    })?;
    log::debug!("constructing {kind} codec with {} options", config.label());
    build(kind, config)
}

/// Construct a codec of a known kind.
pub fn build(kind: CodecKind, config: CodecConfig) -> Result<Compressor> {
    Ok(match kind {
        CodecKind::Png => Compressor::Png(PngCodec::from_config(config)?),
        CodecKind::Jpeg => Compressor::Jpeg(JpegCodec::from_config(config)?),
        CodecKind::WebP => Compressor::WebP(WebPCodec::from_config(config)?),
        CodecKind::Lz4 => Compressor::Lz4(Lz4Codec::from_config(config)?),
        CodecKind::Zstd => Compressor::Zstd(ZstdCodec::from_config(config)?),
        CodecKind::NumPy => Compressor::NumPy(NumPyCodec::from_config(config)?),
    })
}

/// Every registered name, in table order.
pub fn supported_names() -> Vec<&'static str> {
    CodecKind::names()
}
