use std::borrow::Cow;
use std::fmt;

use crate::error::{CodecError, Result};

/// Element type of an [`Array`].
///
/// Multi-byte types are always stored little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Bool,
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
}

impl DType {
    pub const ALL: [DType; 11] = [
        DType::Bool,
        DType::U8,
        DType::I8,
        DType::U16,
        DType::I16,
        DType::U32,
        DType::I32,
        DType::U64,
        DType::I64,
        DType::F32,
        DType::F64,
    ];

    /// Size of one element in bytes.
    pub fn itemsize(self) -> usize {
        match self {
            DType::Bool | DType::U8 | DType::I8 => 1,
            DType::U16 | DType::I16 => 2,
            DType::U32 | DType::I32 | DType::F32 => 4,
            DType::U64 | DType::I64 | DType::F64 => 8,
        }
    }

    /// NumPy `descr` string, e.g. `<u2`.
    pub fn descr(self) -> &'static str {
        match self {
            DType::Bool => "|b1",
            DType::U8 => "|u1",
            DType::I8 => "|i1",
            DType::U16 => "<u2",
            DType::I16 => "<i2",
            DType::U32 => "<u4",
            DType::I32 => "<i4",
            DType::U64 => "<u8",
            DType::I64 => "<i8",
            DType::F32 => "<f4",
            DType::F64 => "<f8",
        }
    }

    /// Parse a NumPy `descr`. Single-byte types may carry any byte-order mark;
    /// wider types must be little-endian.
    pub fn from_descr(descr: &str) -> Option<Self> {
        let order = descr.get(..1)?;
        let dtype = match descr.get(1..)? {
            "b1" | "?" => DType::Bool,
            "u1" => DType::U8,
            "i1" => DType::I8,
            "u2" => DType::U16,
            "i2" => DType::I16,
            "u4" => DType::U32,
            "i4" => DType::I32,
            "u8" => DType::U64,
            "i8" => DType::I64,
            "f4" => DType::F32,
            "f8" => DType::F64,
            _ => return None,
        };
        let little = match order {
            "<" => true,
            "=" => cfg!(target_endian = "little"),
            "|" | ">" => false,
            _ => return None,
        };
        (little || dtype.itemsize() == 1).then_some(dtype)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::Bool => "bool",
            DType::U8 => "uint8",
            DType::I8 => "int8",
            DType::U16 => "uint16",
            DType::I16 => "int16",
            DType::U32 => "uint32",
            DType::I32 => "int32",
            DType::U64 => "uint64",
            DType::I64 => "int64",
            DType::F32 => "float32",
            DType::F64 => "float64",
        };
        f.write_str(name)
    }
}

/// Dense, C-ordered n-dimensional buffer.
///
/// This is the unit every codec compresses: image codecs read it as pixels,
/// byte-stream codecs serialize it first, the NumPy codec writes it as `.npy`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Array {
    dtype: DType,
    shape: Vec<usize>,
    data: Vec<u8>,
}

impl Array {
    /// Wrap `data` as an array, checking that its length matches `shape`.
    pub fn new(dtype: DType, shape: Vec<usize>, data: Vec<u8>) -> Result<Self> {
        let expected = byte_len(dtype, &shape)?;
        if expected != data.len() {
            return Err(CodecError::InvalidShape {
                codec: "array",
                shape,
                reason: Cow::Owned(format!(
                    "expected {expected} bytes of {dtype} but got {}",
                    data.len()
                )),
            });
        }
        Ok(Self { dtype, shape, data })
    }

    /// One-dimensional `u8` array over `data`.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            dtype: DType::U8,
            shape: vec![data.len()],
            data,
        }
    }

    pub fn zeros(dtype: DType, shape: Vec<usize>) -> Result<Self> {
        let len = byte_len(dtype, &shape)?;
        Ok(Self {
            dtype,
            shape,
            data: vec![0u8; len],
        })
    }

    #[inline]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw little-endian element bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Same data, new shape. The element count must not change.
    pub fn reshape(self, shape: Vec<usize>) -> Result<Self> {
        Self::new(self.dtype, shape, self.data)
    }
}

fn byte_len(dtype: DType, shape: &[usize]) -> Result<usize> {
    shape
        .iter()
        .try_fold(dtype.itemsize(), |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| CodecError::InvalidShape {
            codec: "array",
            shape: shape.to_vec(),
            reason: Cow::Borrowed("element count overflows"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_length_mismatch() {
        let err = Array::new(DType::U16, vec![2, 3], vec![0; 11]).unwrap_err();
        assert!(matches!(err, CodecError::InvalidShape { .. }));
        assert!(Array::new(DType::U16, vec![2, 3], vec![0; 12]).is_ok());
    }

    #[test]
    fn scalar_shape_holds_one_element() {
        let a = Array::new(DType::F64, vec![], vec![0; 8]).unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(a.ndim(), 0);
    }

    #[test]
    fn reshape_keeps_data() {
        let a = Array::from_bytes((0..12).collect());
        let b = a.clone().reshape(vec![3, 4]).unwrap();
        assert_eq!(b.shape(), &[3, 4]);
        assert_eq!(b.as_bytes(), a.as_bytes());
        assert!(b.reshape(vec![5]).is_err());
    }

    #[test]
    fn descr_round_trips_for_every_dtype() {
        for dtype in DType::ALL {
            assert_eq!(DType::from_descr(dtype.descr()), Some(dtype));
        }
        assert_eq!(DType::from_descr(">u2"), None);
        assert_eq!(DType::from_descr(">u1"), Some(DType::U8));
        assert_eq!(DType::from_descr("<c16"), None);
        assert_eq!(DType::from_descr(""), None);
    }
}
