use crate::error::SerdeErr;

/// Reads bits back in the order a [`BitWriter`](crate::BitWriter) wrote them.
/// Every read is bounds-checked, malformed input yields [`SerdeErr`].
pub struct BitReader<'b> {
    buffer: &'b [u8],
    bit_position: usize,
}

impl<'b> BitReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self {
            buffer,
            bit_position: 0,
        }
    }

    pub fn bits_remaining(&self) -> usize {
        (self.buffer.len() * 8).saturating_sub(self.bit_position)
    }

    pub fn read_bit(&mut self) -> Result<bool, SerdeErr> {
        let byte_index = self.bit_position / 8;
        let Some(byte) = self.buffer.get(byte_index) else {
            return Err(SerdeErr::UnexpectedEnd {
                needed: 1,
                remaining: 0,
            });
        };
        let bit = (byte >> (self.bit_position % 8)) & 1 != 0;
        self.bit_position += 1;
        Ok(bit)
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        if self.bits_remaining() < 8 {
            return Err(SerdeErr::UnexpectedEnd {
                needed: 8,
                remaining: self.bits_remaining(),
            });
        }
        let mut output = 0u8;
        for index in 0..8 {
            if self.read_bit()? {
                output |= 1 << index;
            }
        }
        Ok(output)
    }
}
