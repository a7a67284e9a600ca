//! Big-endian primitive reads and writes.
//!
//! [`Reader`] consumes fields from the front of a byte slice and tracks the
//! absolute offset and the [`Section`] being decoded, so every failure can be
//! located. [`Writer`] appends fields to a growable buffer.
//!
//! Strings on the wire are "pstrings": one unsigned length byte followed by
//! exactly that many raw bytes. No text encoding is implied by the format.

use crate::error::{DecodeError, EncodeError, Section};
use crate::name::Name;

/// Largest byte length a pstring can carry.
pub const MAX_PSTRING_LEN: usize = u8::MAX as usize;

/// Cursor over an input byte slice.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
    section: Section,
}

impl<'a> Reader<'a> {
    /// Creates a reader positioned at the start of `bytes`.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            offset: 0,
            section: Section::Header,
        }
    }

    /// Number of bytes consumed so far.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes not yet consumed.
    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        self.bytes
    }

    /// Section that subsequent errors are attributed to.
    #[inline]
    pub fn section(&self) -> Section {
        self.section
    }

    /// Attributes subsequent reads to `section`.
    #[inline]
    pub fn enter(&mut self, section: Section) {
        self.section = section;
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let Some((head, tail)) = self.bytes.split_at_checked(n) else {
            return Err(DecodeError::Truncated {
                section: self.section,
                offset: self.offset,
                needed: n,
                available: self.bytes.len(),
            });
        };
        self.bytes = tail;
        self.offset += n;
        Ok(head)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Reads an unsigned byte.
    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take_array::<1>()?[0])
    }

    /// Reads a big-endian signed 16-bit integer.
    pub fn read_i16(&mut self) -> Result<i16, DecodeError> {
        Ok(i16::from_be_bytes(self.take_array()?))
    }

    /// Reads a big-endian signed 32-bit integer.
    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        Ok(i32::from_be_bytes(self.take_array()?))
    }

    /// Reads a big-endian IEEE-754 single precision float.
    pub fn read_f32(&mut self) -> Result<f32, DecodeError> {
        Ok(f32::from_be_bytes(self.take_array()?))
    }

    /// Reads exactly `n` raw bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        self.take(n)
    }

    /// Reads a pstring and returns its raw bytes.
    pub fn read_pstring(&mut self) -> Result<&'a [u8], DecodeError> {
        let len = self.read_u8()? as usize;
        self.take(len)
    }

    /// Reads a pstring as a [`Name`], keeping its bytes unchanged.
    pub fn read_name(&mut self) -> Result<Name, DecodeError> {
        Ok(Name::from(self.read_pstring()?))
    }

    /// Reads a 32-bit count, rejecting negative values.
    pub fn read_count(&mut self) -> Result<usize, DecodeError> {
        let offset = self.offset;
        let count = self.read_i32()?;
        self.check_count(count, offset)
    }

    /// Reads a 16-bit count, rejecting negative values.
    pub fn read_short_count(&mut self) -> Result<usize, DecodeError> {
        let offset = self.offset;
        let count = self.read_i16()?;
        self.check_count(i32::from(count), offset)
    }

    fn check_count(&self, count: i32, offset: usize) -> Result<usize, DecodeError> {
        usize::try_from(count).map_err(|_| DecodeError::InvalidCount {
            section: self.section,
            count,
            offset,
        })
    }

    /// Capacity to reserve for `count` records of at least `min_size` bytes.
    ///
    /// Counts come from untrusted input; the reservation never exceeds what
    /// the remaining bytes could actually hold.
    pub fn capacity_for(&self, count: usize, min_size: usize) -> usize {
        count.min(self.bytes.len() / min_size.max(1))
    }
}

/// Append-only output buffer.
#[derive(Debug, Default, Clone)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer with `capacity` bytes reserved.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the writer, returning the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Writes an unsigned byte.
    pub fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    /// Writes a big-endian signed 16-bit integer.
    pub fn put_i16(&mut self, value: i16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Writes a big-endian signed 32-bit integer.
    pub fn put_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Writes a big-endian IEEE-754 single precision float.
    pub fn put_f32(&mut self, value: f32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Writes raw bytes with no prefix.
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes a pstring.
    pub fn put_pstring(&mut self, bytes: &[u8], section: Section) -> Result<(), EncodeError> {
        let len = u8::try_from(bytes.len()).map_err(|_| EncodeError::StringTooLong {
            section,
            len: bytes.len(),
        })?;
        self.put_u8(len);
        self.put_bytes(bytes);
        Ok(())
    }

    /// Writes the 32-bit count of a list of length `len`.
    pub fn put_count(&mut self, len: usize, section: Section) -> Result<(), EncodeError> {
        let count = i32::try_from(len).map_err(|_| EncodeError::CountOverflow { section, len })?;
        self.put_i32(count);
        Ok(())
    }

    /// Writes the 16-bit count of a list of length `len`.
    pub fn put_short_count(&mut self, len: usize, section: Section) -> Result<(), EncodeError> {
        let count = i16::try_from(len).map_err(|_| EncodeError::CountOverflow { section, len })?;
        self.put_i16(count);
        Ok(())
    }
}
