//! NumPy `.npy` serialization.
//!
//! Writes format version 1.0 (2.0 when the header outgrows a u16) and reads
//! versions 1.0 to 3.0. Only C-ordered, little-endian data is supported.

use crate::array::{Array, DType};
use crate::error::{CodecError, Result};
use crate::format::{NPY_ALIGN, NPY_MAGIC};

/// Serialize `array` to `.npy` bytes.
pub fn to_npy(array: &Array) -> Vec<u8> {
    let dict = format!(
        "{{'descr': '{}', 'fortran_order': False, 'shape': {}, }}",
        array.dtype().descr(),
        shape_tuple(array.shape())
    );

    let (version, prefix_len) = if NPY_MAGIC.len() + 4 + dict.len() + 1 + NPY_ALIGN <= u16::MAX as usize {
        (1u8, NPY_MAGIC.len() + 4)
    } else {
        (2u8, NPY_MAGIC.len() + 6)
    };
    let unpadded = prefix_len + dict.len() + 1;
    let padding = (NPY_ALIGN - unpadded % NPY_ALIGN) % NPY_ALIGN;
    let header_len = dict.len() + padding + 1;

    let mut buf = Vec::with_capacity(prefix_len + header_len + array.as_bytes().len());
    buf.extend_from_slice(NPY_MAGIC);
    buf.extend_from_slice(&[version, 0]);
    if version == 1 {
        buf.extend_from_slice(&(header_len as u16).to_le_bytes());
    } else {
        buf.extend_from_slice(&(header_len as u32).to_le_bytes());
    }
    buf.extend_from_slice(dict.as_bytes());
    buf.resize(buf.len() + padding, b' ');
    buf.push(b'\n');
    buf.extend_from_slice(array.as_bytes());
    buf
}

/// Parse `.npy` bytes back into an array. `codec` names the caller in errors.
pub fn from_npy(buf: &[u8], codec: &'static str) -> Result<Array> {
    if !buf.starts_with(NPY_MAGIC) {
        return Err(CodecError::decode(codec, "invalid .npy magic bytes"));
    }
    let major = *buf
        .get(NPY_MAGIC.len())
        .ok_or_else(|| CodecError::decode(codec, "truncated .npy version"))?;

    let (header_len, header_start) = match major {
        1 => {
            let raw = read_le::<2>(buf, 8, codec)?;
            (u16::from_le_bytes(raw) as usize, 10usize)
        }
        2 | 3 => {
            let raw = read_le::<4>(buf, 8, codec)?;
            (u32::from_le_bytes(raw) as usize, 12usize)
        }
        other => {
            return Err(CodecError::decode(
                codec,
                format!("unsupported .npy format version {other}"),
            ))
        }
    };

    let data_start = header_start
        .checked_add(header_len)
        .filter(|&end| end <= buf.len())
        .ok_or_else(|| CodecError::decode(codec, "truncated .npy header"))?;
    let header = std::str::from_utf8(&buf[header_start..data_start])
        .map_err(|_| CodecError::decode(codec, ".npy header is not valid text"))?;

    let descr = quoted(field(header, "descr", codec)?)
        .ok_or_else(|| CodecError::decode(codec, ".npy descr is not a string"))?;
    let dtype = DType::from_descr(descr).ok_or_else(|| CodecError::UnsupportedDtype {
        codec,
        dtype: descr.to_string(),
    })?;

    let fortran = field(header, "fortran_order", codec)?;
    if fortran.starts_with("True") {
        return Err(CodecError::decode(codec, "fortran-ordered .npy data is not supported"));
    } else if !fortran.starts_with("False") {
        return Err(CodecError::decode(codec, ".npy fortran_order is not a bool"));
    }

    let shape = parse_shape(field(header, "shape", codec)?, codec)?;
    let data = &buf[data_start..];
    let expected = shape
        .iter()
        .try_fold(dtype.itemsize(), |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| CodecError::decode(codec, ".npy shape overflows"))?;
    if data.len() != expected {
        return Err(CodecError::decode(
            codec,
            format!(
                ".npy data is {} bytes but shape {shape:?} of {dtype} needs {expected}",
                data.len()
            ),
        ));
    }

    Array::new(dtype, shape, data.to_vec())
}

fn shape_tuple(shape: &[usize]) -> String {
    match shape {
        [] => "()".to_string(),
        [dim] => format!("({dim},)"),
        dims => {
            let parts: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
            format!("({})", parts.join(", "))
        }
    }
}

fn read_le<const N: usize>(buf: &[u8], at: usize, codec: &'static str) -> Result<[u8; N]> {
    let mut raw = [0u8; N];
    raw.copy_from_slice(
        buf.get(at..at + N)
            .ok_or_else(|| CodecError::decode(codec, "truncated .npy header length"))?,
    );
    Ok(raw)
}

/// The text following `'key':` in the header dict.
fn field<'h>(header: &'h str, key: &str, codec: &'static str) -> Result<&'h str> {
    for quote in ['\'', '"'] {
        let needle = format!("{quote}{key}{quote}");
        if let Some(at) = header.find(&needle) {
            let rest = header[at + needle.len()..].trim_start();
            if let Some(value) = rest.strip_prefix(':') {
                return Ok(value.trim_start());
            }
        }
    }
    Err(CodecError::decode(codec, format!(".npy header has no '{key}' field")))
}

fn quoted(value: &str) -> Option<&str> {
    let quote = value.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let body = &value[1..];
    body.find(quote).map(|end| &body[..end])
}

fn parse_shape(value: &str, codec: &'static str) -> Result<Vec<usize>> {
    let inner = value
        .strip_prefix('(')
        .and_then(|rest| rest.find(')').map(|end| &rest[..end]))
        .ok_or_else(|| CodecError::decode(codec, ".npy shape is not a tuple"))?;
    inner
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            // Python 2 era writers emit longs like `3L`.
            part.trim_end_matches('L')
                .parse::<usize>()
                .map_err(|_| CodecError::decode(codec, format!("invalid .npy dimension '{part}'")))
        })
        .collect()
}
