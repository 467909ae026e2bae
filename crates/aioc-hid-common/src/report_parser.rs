//! HID report parsing utilities

use crate::{HidCommonError, HidCommonResult};

/// Little-endian cursor over a received report.
pub struct ReportParser<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> ReportParser<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            buffer: data,
            position: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    pub fn read_u8(&mut self) -> HidCommonResult<u8> {
        let [value] = self.take::<1>()?;
        Ok(value)
    }

    pub fn read_u16_le(&mut self) -> HidCommonResult<u16> {
        Ok(u16::from_le_bytes(self.take::<2>()?))
    }

    pub fn read_u32_le(&mut self) -> HidCommonResult<u32> {
        Ok(u32::from_le_bytes(self.take::<4>()?))
    }

    pub fn read_bytes(&mut self, count: usize) -> HidCommonResult<&'a [u8]> {
        let end = self
            .position
            .checked_add(count)
            .filter(|end| *end <= self.buffer.len())
            .ok_or_else(unexpected_end)?;
        let bytes = self.buffer.get(self.position..end).ok_or_else(unexpected_end)?;
        self.position = end;
        Ok(bytes)
    }

    pub fn skip(&mut self, count: usize) {
        self.position = self.position.saturating_add(count).min(self.buffer.len());
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }

    pub fn slice(&self) -> &'a [u8] {
        self.buffer
    }

    fn take<const N: usize>(&mut self) -> HidCommonResult<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }
}

fn unexpected_end() -> HidCommonError {
    HidCommonError::InvalidReport("Unexpected end of data".to_string())
}
