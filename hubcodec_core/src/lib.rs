//! Shared building blocks for hubcodec: the [`Array`] buffer every codec
//! consumes, the [`Codec`] traits, codec identifiers, per-codec configuration
//! and the error taxonomy.

pub mod array;
pub mod codec;
pub mod config;
pub mod error;
pub mod format;
pub mod npy;

pub use array::{Array, DType};
pub use codec::{ByteCodec, Codec, CodecFamily, CodecKind};
pub use config::{CodecConfig, JpegConfig, Lz4Config, PngConfig, ZstdConfig};
pub use error::{CodecError, Result, UnsupportedCodecError};
pub use format::BatchFrame;
