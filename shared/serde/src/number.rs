use crate::{
    bit_reader::BitReader, bit_writer::BitWrite, error::SerdeErr, serde::Serde, ConstBitLength,
};

// Integers

pub trait SerdeIntegerConversion<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> {
    fn from(value: &SerdeInteger<SIGNED, VARIABLE, BITS>) -> Self;
}

pub type UnsignedInteger<const BITS: u8> = SerdeInteger<false, false, BITS>;
pub type SignedInteger<const BITS: u8> = SerdeInteger<true, false, BITS>;
pub type UnsignedVariableInteger<const BITS: u8> = SerdeInteger<false, true, BITS>;
pub type SignedVariableInteger<const BITS: u8> = SerdeInteger<true, true, BITS>;

/// An integer written with exactly `BITS` bits, or, when `VARIABLE`, in
/// chunks of `BITS` bits each preceded by a continuation bit.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct SerdeInteger<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> {
    inner: NumberInner,
}

impl<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> SerdeInteger<SIGNED, VARIABLE, BITS> {
    pub fn new<T: Into<i128>>(value: T) -> Self {
        Self {
            inner: NumberInner::new(SIGNED, VARIABLE, BITS, value.into()),
        }
    }

    pub fn get(&self) -> i128 {
        self.inner.value
    }

    pub fn to<T: SerdeIntegerConversion<SIGNED, VARIABLE, BITS>>(&self) -> T {
        T::from(self)
    }
}

impl<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> Serde
    for SerdeInteger<SIGNED, VARIABLE, BITS>
{
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.inner.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let inner = NumberInner::de(reader, SIGNED, VARIABLE, BITS)?;
        Ok(Self { inner })
    }

    fn bit_length(&self) -> u32 {
        self.inner.bit_length()
    }
}

impl<const SIGNED: bool, const BITS: u8> ConstBitLength for SerdeInteger<SIGNED, false, BITS> {
    fn const_bit_length() -> u32 {
        SIGNED as u32 + BITS as u32
    }
}

impl<const SIGNED: bool, const VARIABLE: bool, const BITS: u8, T: TryFrom<i128>>
    SerdeIntegerConversion<SIGNED, VARIABLE, BITS> for T
{
    fn from(value: &SerdeInteger<SIGNED, VARIABLE, BITS>) -> Self {
        let Ok(t_value) = T::try_from(value.get()) else {
            panic!("SerdeInteger's value is out of range to convert to this type.");
        };
        t_value
    }
}

// Floats

pub trait SerdeFloatConversion<
    const SIGNED: bool,
    const VARIABLE: bool,
    const BITS: u8,
    const FRACTION_DIGITS: u8,
>
{
    fn from(value: &SerdeFloat<SIGNED, VARIABLE, BITS, FRACTION_DIGITS>) -> Self;
}

pub type UnsignedFloat<const BITS: u8, const FRACTION_DIGITS: u8> =
    SerdeFloat<false, false, BITS, FRACTION_DIGITS>;
pub type SignedFloat<const BITS: u8, const FRACTION_DIGITS: u8> =
    SerdeFloat<true, false, BITS, FRACTION_DIGITS>;
pub type UnsignedVariableFloat<const BITS: u8, const FRACTION_DIGITS: u8> =
    SerdeFloat<false, true, BITS, FRACTION_DIGITS>;
pub type SignedVariableFloat<const BITS: u8, const FRACTION_DIGITS: u8> =
    SerdeFloat<true, true, BITS, FRACTION_DIGITS>;

/// A float quantized to `FRACTION_DIGITS` decimal places and written as an
/// integer. Reading back yields the quantized value, not the original.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct SerdeFloat<
    const SIGNED: bool,
    const VARIABLE: bool,
    const BITS: u8,
    const FRACTION_DIGITS: u8,
> {
    inner: NumberInner,
}

impl<const SIGNED: bool, const VARIABLE: bool, const BITS: u8, const FRACTION_DIGITS: u8>
    SerdeFloat<SIGNED, VARIABLE, BITS, FRACTION_DIGITS>
{
    pub fn new<T: Into<f32>>(value: T) -> Self {
        // the cast saturates; i128::MIN has no positive counterpart to decode into
        let scaled = ((value.into() * Self::scale()).round() as i128).max(-i128::MAX);
        Self {
            inner: NumberInner::new(SIGNED, VARIABLE, BITS, scaled),
        }
    }

    pub fn get(&self) -> f32 {
        self.inner.value as f32 / Self::scale()
    }

    fn scale() -> f32 {
        10f32.powi(FRACTION_DIGITS as i32)
    }
}

impl<const S: bool, const V: bool, const B: u8, const F: u8> Serde for SerdeFloat<S, V, B, F> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.inner.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let inner = NumberInner::de(reader, S, V, B)?;
        Ok(Self { inner })
    }

    fn bit_length(&self) -> u32 {
        self.inner.bit_length()
    }
}

impl<const SIGNED: bool, const BITS: u8, const FRACTION_DIGITS: u8> ConstBitLength
    for SerdeFloat<SIGNED, false, BITS, FRACTION_DIGITS>
{
    fn const_bit_length() -> u32 {
        SIGNED as u32 + BITS as u32
    }
}

impl<
        const SIGNED: bool,
        const VARIABLE: bool,
        const BITS: u8,
        const FRACTION_DIGITS: u8,
        T: From<f32>,
    > SerdeFloatConversion<SIGNED, VARIABLE, BITS, FRACTION_DIGITS> for T
{
    fn from(value: &SerdeFloat<SIGNED, VARIABLE, BITS, FRACTION_DIGITS>) -> Self {
        T::from(value.get())
    }
}

// Shared, non-generic body so each const instantiation stays small

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
struct NumberInner {
    value: i128,
    signed: bool,
    variable: bool,
    bits: u8,
}

impl NumberInner {
    fn new(signed: bool, variable: bool, bits: u8, value: i128) -> Self {
        if bits == 0 {
            panic!("can't create a number with 0 bits...");
        }
        if bits > 127 {
            panic!("can't create a number with more than 127 bits...");
        }
        if !signed && value < 0 {
            panic!("can't encode a negative number with an Unsigned type!");
        }
        if !variable {
            let limit: u128 = 1 << bits;
            if value.unsigned_abs() >= limit {
                panic!(
                    "value `{}` is out of range (with `{}` bits, magnitude must stay below `{}`)",
                    value, bits, limit
                );
            }
        }

        Self {
            value,
            signed,
            variable,
            bits,
        }
    }

    fn ser(&self, writer: &mut dyn BitWrite) {
        if self.signed {
            writer.write_bit(self.value < 0);
        }
        let mut magnitude = self.value.unsigned_abs();

        if self.variable {
            loop {
                let proceed = magnitude >> self.bits != 0;
                writer.write_bit(proceed);
                for _ in 0..self.bits {
                    writer.write_bit(magnitude & 1 != 0);
                    magnitude >>= 1;
                }
                if !proceed {
                    return;
                }
            }
        } else {
            for _ in 0..self.bits {
                writer.write_bit(magnitude & 1 != 0);
                magnitude >>= 1;
            }
        }
    }

    fn de(reader: &mut BitReader, signed: bool, variable: bool, bits: u8) -> Result<Self, SerdeErr> {
        let negative = signed && reader.read_bit()?;

        let mut magnitude: u128 = 0;
        let mut shift: u32 = 0;
        loop {
            let proceed = if variable { reader.read_bit()? } else { false };
            for _ in 0..bits {
                let bit = reader.read_bit()?;
                if bit {
                    if shift >= 127 {
                        return Err(SerdeErr::InvalidValue {
                            type_name: "variable integer",
                        });
                    }
                    magnitude |= 1 << shift;
                }
                shift += 1;
            }
            if !proceed {
                break;
            }
        }

        let value = magnitude as i128;
        Ok(Self {
            value: if negative { -value } else { value },
            signed,
            variable,
            bits,
        })
    }

    fn bit_length(&self) -> u32 {
        let sign_bit = self.signed as u32;
        if !self.variable {
            return sign_bit + self.bits as u32;
        }

        let mut magnitude = self.value.unsigned_abs();
        let mut output = sign_bit;
        loop {
            output += 1 + self.bits as u32;
            magnitude >>= self.bits;
            if magnitude == 0 {
                return output;
            }
        }
    }
}
