// Error taxonomy shared by the registry and every codec variant.
//
// - UnsupportedCodec: the only failure owned by the registry
// - ConfigMismatch / InvalidArgument: construction-time validation
// - InvalidShape / UnsupportedDtype: input the codec cannot represent
// - Encode / Decode: failures inside the underlying compression library

use std::borrow::Cow;
use std::fmt;

use thiserror::Error;

/// Returned by the registry when a compressor name is not registered.
///
/// Carries the rejected name and the full list of registered names, in
/// registry order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedCodecError {
    pub name: String,
    pub supported: Vec<&'static str>,
}

impl fmt::Display for UnsupportedCodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wrong compressor: '{}'; only ", self.name)?;
        let quoted: Vec<String> = self.supported.iter().map(|n| format!("'{n}'")).collect();
        match quoted.split_last() {
            Some((last, [])) => write!(f, "{last}")?,
            Some((last, rest)) => write!(f, "{} and {last}", rest.join(", "))?,
            None => write!(f, "nothing")?,
        }
        write!(f, " are supported")
    }
}

impl std::error::Error for UnsupportedCodecError {}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error(transparent)]
    UnsupportedCodec(#[from] UnsupportedCodecError),

    #[error("codec {codec} cannot be configured with {config} options")]
    ConfigMismatch {
        codec: &'static str,
        config: &'static str,
    },

    #[error("invalid value for {codec} option {option}: {value}. {reason}")]
    InvalidArgument {
        codec: &'static str,
        option: &'static str,
        value: i64,
        reason: Cow<'static, str>,
    },

    #[error("{codec} cannot handle array of shape {shape:?}: {reason}")]
    InvalidShape {
        codec: &'static str,
        shape: Vec<usize>,
        reason: Cow<'static, str>,
    },

    #[error("{codec} does not support dtype {dtype}")]
    UnsupportedDtype { codec: &'static str, dtype: String },

    #[error("{codec} encode failed: {message}")]
    Encode {
        codec: &'static str,
        message: Cow<'static, str>,
    },

    #[error("{codec} decode failed: {message}")]
    Decode {
        codec: &'static str,
        message: Cow<'static, str>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CodecError {
    pub fn encode(codec: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        Self::Encode {
            codec,
            message: message.into(),
        }
    }

    pub fn decode(codec: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        Self::Decode {
            codec,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_message_lists_every_name() {
        let err = UnsupportedCodecError {
            name: "brotli".into(),
            supported: vec!["lz4", "png", "zstd"],
        };
        assert_eq!(
            err.to_string(),
            "wrong compressor: 'brotli'; only 'lz4', 'png' and 'zstd' are supported"
        );
    }

    #[test]
    fn unsupported_converts_into_codec_error() {
        let err: CodecError = UnsupportedCodecError {
            name: "x".into(),
            supported: vec!["lz4"],
        }
        .into();
        assert!(matches!(err, CodecError::UnsupportedCodec(ref e) if e.name == "x"));
        assert!(err.to_string().contains("only 'lz4' are supported"));
    }
}
