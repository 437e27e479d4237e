use super::error::DecodeError;

/// Forward-only cursor over an animation package buffer.
///
/// Every read checks the remaining length first and leaves the cursor
/// untouched when it fails. Endianness is explicit per call because the
/// format mixes both orders inside a single layer record.
pub struct AnimReader<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> AnimReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.offset
    }

    /// Upper bound on how many records of `record_len` bytes could still fit.
    pub fn max_records(&self, record_len: usize) -> usize {
        self.remaining() / record_len.max(1)
    }

    pub fn read_u8(&mut self, field: &'static str) -> Result<u8, DecodeError> {
        let [value] = self.take::<1>(field)?;
        Ok(value)
    }

    pub fn read_i8(&mut self, field: &'static str) -> Result<i8, DecodeError> {
        let bytes = self.take::<1>(field)?;
        Ok(i8::from_be_bytes(bytes))
    }

    pub fn read_u16_be(&mut self, field: &'static str) -> Result<u16, DecodeError> {
        Ok(u16::from_be_bytes(self.take(field)?))
    }

    pub fn read_u16_le(&mut self, field: &'static str) -> Result<u16, DecodeError> {
        Ok(u16::from_le_bytes(self.take(field)?))
    }

    pub fn read_u32_be(&mut self, field: &'static str) -> Result<u32, DecodeError> {
        Ok(u32::from_be_bytes(self.take(field)?))
    }

    fn take<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], DecodeError> {
        let bytes: [u8; N] = self
            .buffer
            .get(self.offset..)
            .and_then(|rest| rest.get(..N))
            .and_then(|slice| slice.try_into().ok())
            .ok_or(DecodeError::OutOfBounds {
                field,
                at_offset: self.offset,
                needed_bytes: N,
                available_bytes: self.remaining(),
            })?;
        self.offset += N;
        Ok(bytes)
    }
}
