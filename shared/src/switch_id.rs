use std::{collections::HashMap, fmt};

use sceneshift_serde::{BitReader, BitWrite, ConstBitLength, Serde, SerdeErr};

/// Identifies one scene switch attempt. 16 bytes on the wire.
///
/// [`SwitchId::EMPTY`] is the "no attempt" sentinel a client sends when it
/// acknowledges the first scene it loads on connect, before any attempt
/// existed.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SwitchId(u128);

impl SwitchId {
    pub const EMPTY: Self = Self(0);

    /// Generates an id that is neither [`SwitchId::EMPTY`] nor a key of `live`
    pub fn generate<V>(live: &HashMap<SwitchId, V>) -> Self {
        loop {
            let candidate = Self(fastrand::u128(1..));
            if !live.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    pub const fn from_u128(value: u128) -> Self {
        Self(value)
    }

    pub const fn to_u128(&self) -> u128 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    pub fn to_bytes(&self) -> [u8; 16] {
        self.0.to_le_bytes()
    }
}

impl Default for SwitchId {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for SwitchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SwitchId({:032x})", self.0)
    }
}

impl fmt::Display for SwitchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl Serde for SwitchId {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.0.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self(u128::de(reader)?))
    }

    fn bit_length(&self) -> u32 {
        Self::const_bit_length()
    }
}

impl ConstBitLength for SwitchId {
    fn const_bit_length() -> u32 {
        128
    }
}
