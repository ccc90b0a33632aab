use std::fmt;

use sceneshift_serde::{BitReader, BitWrite, ConstBitLength, Serde, SerdeErr};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostType {
    Server,
    Client,
}

impl HostType {
    pub fn is_authority(self) -> bool {
        self == HostType::Server
    }
}

macro_rules! impl_wire_id {
    ($name:ident, $inner:ty) => {
        impl $name {
            pub const fn new(value: $inner) -> Self {
                Self(value)
            }

            pub const fn value(&self) -> $inner {
                self.0
            }
        }

        impl Serde for $name {
            fn ser(&self, writer: &mut dyn BitWrite) {
                self.0.ser(writer);
            }

            fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
                Ok(Self(<$inner>::de(reader)?))
            }

            fn bit_length(&self) -> u32 {
                <$inner as ConstBitLength>::const_bit_length()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

/// Identifies a connected participant. The authority itself is
/// [`EndpointId::SERVER`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EndpointId(u64);

impl EndpointId {
    pub const SERVER: Self = Self(0);
}

impl_wire_id!(EndpointId, u64);

/// Stable network identity of a replicated object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetworkId(u64);

impl_wire_id!(NetworkId, u64);

/// Position of a scene in the [`SceneRegistry`](crate::SceneRegistry),
/// identical on every participant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneIndex(u32);

impl_wire_id!(SceneIndex, u32);
