//! # Sceneshift Serde
//! Bit-level writers, readers and the `Serde` trait used to encode scene
//! switch messages and object snapshots.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod bit_reader;
mod bit_writer;
mod error;
mod impls;
mod number;
mod serde;

pub use bit_reader::BitReader;
pub use bit_writer::{BitCounter, BitWrite, BitWriter};
pub use error::SerdeErr;
pub use number::{
    SerdeFloat, SerdeFloatConversion, SerdeInteger, SerdeIntegerConversion, SignedFloat,
    SignedInteger, SignedVariableFloat, SignedVariableInteger, UnsignedFloat, UnsignedInteger,
    UnsignedVariableFloat, UnsignedVariableInteger,
};
pub use serde::{ConstBitLength, Serde};
