//! Sequential binary reader and writer primitives.

use std::io::{self, Read, Seek, SeekFrom, Write};

use super::{CodecError, MAX_PREALLOCATION};
use crate::coord::GeoCoord;
use crate::features::FeatureValues;
use crate::types::TypeId;

const MAX_NUMBER_BYTES: u32 = 10;

/// Reads primitives from a byte stream.
#[derive(Debug)]
pub struct DataScanner<R> {
    inner: R,
}

impl<R: Read> DataScanner<R> {
    /// Wrap a reader.
    pub const fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Mutable access to the wrapped reader.
    pub const fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Unwrap the reader.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut buf = [0_u8; N];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Read one byte.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Io`] when the stream is exhausted.
    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        let [byte] = self.read_array::<1>()?;
        Ok(byte)
    }

    /// Read a little-endian `u32`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Io`] when the stream is exhausted.
    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        self.read_array().map(u32::from_le_bytes)
    }

    /// Read a little-endian `u64`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Io`] when the stream is exhausted.
    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        self.read_array().map(u64::from_le_bytes)
    }

    /// Read an unsigned LEB128 number.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::NumberOverflow`] for encodings longer than 64 bits.
    pub fn read_number(&mut self) -> Result<u64, CodecError> {
        let mut value = 0_u64;
        for index in 0..MAX_NUMBER_BYTES {
            let byte = self.read_u8()?;
            let payload = u64::from(byte & 0x7F);
            let shift = index * 7;
            if shift == 63 && payload > 1 {
                return Err(CodecError::NumberOverflow);
            }
            value |= payload << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(CodecError::NumberOverflow)
    }

    /// Read a LEB128 number that must fit a `u32`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::CountOverflow`] for values above `u32::MAX`.
    pub fn read_number_u32(&mut self) -> Result<u32, CodecError> {
        let value = self.read_number()?;
        u32::try_from(value).map_err(|_| CodecError::CountOverflow(value))
    }

    /// Read a LEB128 element count.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::CountOverflow`] for counts above `u32::MAX`.
    pub fn read_count(&mut self) -> Result<usize, CodecError> {
        let count = self.read_number_u32()?;
        usize::try_from(count).map_err(|_| CodecError::CountOverflow(u64::from(count)))
    }

    /// Read a type code stored in `width` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Io`] when the stream is exhausted.
    pub fn read_type_id(&mut self, width: u8) -> Result<TypeId, CodecError> {
        if width == 1 {
            self.read_u8().map(TypeId::from)
        } else {
            self.read_array().map(TypeId::from_le_bytes)
        }
    }

    /// Read a length-prefixed UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidUtf8`] for malformed payloads.
    pub fn read_string(&mut self) -> Result<String, CodecError> {
        let len = u64::from(self.read_number_u32()?);
        let mut bytes = Vec::new();
        let read = (&mut self.inner).take(len).read_to_end(&mut bytes)?;
        if u64::try_from(read).ok() != Some(len) {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }
        Ok(String::from_utf8(bytes)?)
    }

    /// Read a delta-encoded coordinate list.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::CoordinateOverflow`] when a delta leaves the raw
    /// coordinate range.
    pub fn read_coords(&mut self) -> Result<Vec<GeoCoord>, CodecError> {
        let count = self.read_count()?;
        let mut nodes = Vec::with_capacity(count.min(MAX_PREALLOCATION));
        let (mut lat, mut lon) = (0_u32, 0_u32);
        for _ in 0..count {
            lat = apply_delta(lat, zigzag_decode(self.read_number()?))?;
            lon = apply_delta(lon, zigzag_decode(self.read_number()?))?;
            nodes.push(GeoCoord::from_raw(lat, lon));
        }
        Ok(nodes)
    }

    /// Read `count` attribute values and the record's special flag.
    ///
    /// # Errors
    ///
    /// Propagates string and stream failures.
    pub fn read_features(&mut self, count: usize) -> Result<(FeatureValues, bool), CodecError> {
        let mask_len = mask_len(count);
        let mut mask = vec![0_u8; mask_len];
        self.inner.read_exact(&mut mask)?;
        let mut values = FeatureValues::with_len(count);
        for index in 0..count {
            if bit_is_set(&mask, index) {
                values.set(index, Some(self.read_string()?));
            }
        }
        Ok((values, bit_is_set(&mask, count)))
    }
}

/// Writes primitives to a byte stream.
#[derive(Debug)]
pub struct DataWriter<W> {
    inner: W,
}

impl<W: Write> DataWriter<W> {
    /// Wrap a writer.
    pub const fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Mutable access to the wrapped writer.
    pub const fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Write one byte.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Io`] when the stream rejects the write.
    pub fn write_u8(&mut self, value: u8) -> Result<(), CodecError> {
        Ok(self.inner.write_all(&[value])?)
    }

    /// Write a little-endian `u32`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Io`] when the stream rejects the write.
    pub fn write_u32(&mut self, value: u32) -> Result<(), CodecError> {
        Ok(self.inner.write_all(&value.to_le_bytes())?)
    }

    /// Write a little-endian `u64`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Io`] when the stream rejects the write.
    pub fn write_u64(&mut self, value: u64) -> Result<(), CodecError> {
        Ok(self.inner.write_all(&value.to_le_bytes())?)
    }

    /// Write an unsigned LEB128 number.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Io`] when the stream rejects the write.
    pub fn write_number(&mut self, value: u64) -> Result<(), CodecError> {
        let mut buf = [0_u8; 10];
        let len = encode_number(value, &mut buf);
        let encoded = buf.get(..len).unwrap_or(buf.as_slice());
        Ok(self.inner.write_all(encoded)?)
    }

    /// Write an element count.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::CountOverflow`] for counts above `u32::MAX`.
    pub fn write_count(&mut self, count: usize) -> Result<(), CodecError> {
        let value = u32::try_from(count)
            .map_err(|_| CodecError::CountOverflow(u64::try_from(count).unwrap_or(u64::MAX)))?;
        self.write_number(u64::from(value))
    }

    /// Write a type code in `width` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::CountOverflow`] when `id` does not fit `width`.
    pub fn write_type_id(&mut self, id: TypeId, width: u8) -> Result<(), CodecError> {
        if width == 1 {
            let byte = u8::try_from(id).map_err(|_| CodecError::CountOverflow(u64::from(id)))?;
            self.write_u8(byte)
        } else {
            Ok(self.inner.write_all(&id.to_le_bytes())?)
        }
    }

    /// Write a length-prefixed UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::CountOverflow`] for strings longer than `u32::MAX`.
    pub fn write_string(&mut self, value: &str) -> Result<(), CodecError> {
        self.write_count(value.len())?;
        Ok(self.inner.write_all(value.as_bytes())?)
    }

    /// Write a delta-encoded coordinate list.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Io`] when the stream rejects the write.
    pub fn write_coords(&mut self, nodes: &[GeoCoord]) -> Result<(), CodecError> {
        self.write_count(nodes.len())?;
        let (mut lat, mut lon) = (0_u32, 0_u32);
        for node in nodes {
            self.write_number(zigzag_encode(delta(lat, node.raw_lat())))?;
            self.write_number(zigzag_encode(delta(lon, node.raw_lon())))?;
            (lat, lon) = (node.raw_lat(), node.raw_lon());
        }
        Ok(())
    }

    /// Write attribute values preceded by a presence mask holding `flag`.
    ///
    /// # Errors
    ///
    /// Propagates string and stream failures.
    pub fn write_features(&mut self, values: &FeatureValues, flag: bool) -> Result<(), CodecError> {
        let count = values.len();
        let mut mask = vec![0_u8; mask_len(count)];
        for (index, value) in values.iter().enumerate() {
            if value.is_some() {
                set_bit(&mut mask, index);
            }
        }
        if flag {
            set_bit(&mut mask, count);
        }
        self.inner.write_all(&mask)?;
        for value in values.iter().flatten() {
            self.write_string(value)?;
        }
        Ok(())
    }
}

impl<W: Write + Seek> DataWriter<W> {
    /// Current byte offset in the stream.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Io`] when the position cannot be queried.
    pub fn position(&mut self) -> Result<u64, CodecError> {
        Ok(self.inner.stream_position()?)
    }

    /// Move to an absolute byte offset.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Io`] when seeking fails.
    pub fn seek_to(&mut self, offset: u64) -> Result<(), CodecError> {
        self.inner.seek(SeekFrom::Start(offset))?;
        Ok(())
    }
}

/// Encode `value` as LEB128 into `buf`, returning the encoded length.
#[expect(
    clippy::cast_possible_truncation,
    reason = "value is masked to seven bits before narrowing"
)]
#[expect(clippy::indexing_slicing, reason = "a u64 needs at most ten groups")]
fn encode_number(mut value: u64, buf: &mut [u8; 10]) -> usize {
    let mut len = 0;
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf[len] = byte;
        len += 1;
        if value == 0 {
            return len;
        }
    }
}

const fn mask_len(count: usize) -> usize {
    count.saturating_add(1).div_ceil(8)
}

fn bit_is_set(mask: &[u8], index: usize) -> bool {
    mask.get(index >> 3)
        .is_some_and(|byte| byte & (1 << (index & 7)) != 0)
}

fn set_bit(mask: &mut [u8], index: usize) {
    if let Some(byte) = mask.get_mut(index >> 3) {
        *byte |= 1 << (index & 7);
    }
}

fn delta(previous: u32, current: u32) -> i64 {
    i64::from(current) - i64::from(previous)
}

fn apply_delta(previous: u32, delta: i64) -> Result<u32, CodecError> {
    i64::from(previous)
        .checked_add(delta)
        .and_then(|value| u32::try_from(value).ok())
        .ok_or(CodecError::CoordinateOverflow)
}

/// Map signed values onto unsigned ones: 0, -1, 1, -2 become 0, 1, 2, 3.
const fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)).cast_unsigned()
}

const fn zigzag_decode(value: u64) -> i64 {
    (value >> 1).cast_signed() ^ -((value & 1).cast_signed())
}
