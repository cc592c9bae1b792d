use crate::error::{CodecError, Result};

/// Magic bytes opening every `.npy` payload.
pub const NPY_MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Array data in a `.npy` payload starts at a multiple of this many bytes.
pub const NPY_ALIGN: usize = 64;

/// Magic bytes for a batch of independently encoded images.
/// 8 bytes: "HCIMGB1" followed by a null byte. Cannot collide with the PNG,
/// JPEG or RIFF signatures that open a single encoded image.
pub const BATCH_MAGIC: &[u8; 8] = b"HCIMGB1\x00";

/// Container for a batch of images encoded one by one.
///
/// # Layout
/// ```text
/// [magic: 8 bytes]
/// [ndim: u8] [shape: u64 LE × ndim]     ← shape of the whole batch array
/// [count: u32 LE]
/// [len: u32 LE] [encoded image] × count
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchFrame {
    pub shape: Vec<usize>,
    pub items: Vec<Vec<u8>>,
}

impl BatchFrame {
    /// Whether `buf` starts with the batch magic.
    pub fn is_batch(buf: &[u8]) -> bool {
        buf.starts_with(BATCH_MAGIC)
    }

    /// Serialize into one contiguous buffer. `codec` names the caller in
    /// error messages.
    ///
    /// Fails when the shape has more than 255 dimensions or an item count or
    /// length does not fit in a `u32`.
    pub fn to_bytes(&self, codec: &'static str) -> Result<Vec<u8>> {
        let ndim = u8::try_from(self.shape.len()).map_err(|_| {
            CodecError::encode(codec, format!("batch has {} dimensions, at most 255 fit", self.shape.len()))
        })?;
        let count = u32::try_from(self.items.len()).map_err(|_| {
            CodecError::encode(codec, format!("batch of {} images is too large", self.items.len()))
        })?;

        let payload: usize = self.items.iter().map(|i| 4 + i.len()).sum();
        let mut buf = Vec::with_capacity(8 + 1 + 8 * self.shape.len() + 4 + payload);
        buf.extend_from_slice(BATCH_MAGIC);
        buf.push(ndim);
        for &dim in &self.shape {
            buf.extend_from_slice(&(dim as u64).to_le_bytes());
        }
        buf.extend_from_slice(&count.to_le_bytes());
        for item in &self.items {
            let len = u32::try_from(item.len()).map_err(|_| {
                CodecError::encode(codec, format!("encoded image of {} bytes is too large", item.len()))
            })?;
            buf.extend_from_slice(&len.to_le_bytes());
            buf.extend_from_slice(item);
        }
        Ok(buf)
    }

    /// Deserialize, checking the magic and every length against `buf`.
    /// `codec` names the caller in error messages.
    pub fn from_bytes(buf: &[u8], codec: &'static str) -> Result<Self> {
        let mut cursor = Cursor { buf, pos: 0, codec };
        if cursor.take(BATCH_MAGIC.len())? != BATCH_MAGIC {
            return Err(CodecError::decode(codec, "invalid batch magic bytes"));
        }

        let ndim = cursor.take(1)?[0] as usize;
        let mut shape = Vec::with_capacity(ndim);
        for _ in 0..ndim {
            let dim = cursor.u64()?;
            shape.push(usize::try_from(dim).map_err(|_| {
                CodecError::decode(codec, format!("batch dimension {dim} does not fit in memory"))
            })?);
        }

        let count = cursor.u32()? as usize;
        // Every item needs at least its length prefix.
        if count > cursor.remaining() / 4 {
            return Err(CodecError::decode(
                codec,
                format!("batch claims {count} items but only {} bytes follow", cursor.remaining()),
            ));
        }
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            let len = cursor.u32()? as usize;
            items.push(cursor.take(len)?.to_vec());
        }

        if cursor.remaining() != 0 {
            return Err(CodecError::decode(
                codec,
                format!("{} trailing bytes after batch", cursor.remaining()),
            ));
        }
        Ok(Self { shape, items })
    }
}

struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
    codec: &'static str,
}

impl<'a> Cursor<'a> {
    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(CodecError::decode(
                self.codec,
                format!(
                    "truncated batch: need {n} bytes at offset {}, have {}",
                    self.pos,
                    self.remaining()
                ),
            ));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn u32(&mut self) -> Result<u32> {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(self.take(4)?);
        Ok(u32::from_le_bytes(raw))
    }

    fn u64(&mut self) -> Result<u64> {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(self.take(8)?);
        Ok(u64::from_le_bytes(raw))
    }
}
