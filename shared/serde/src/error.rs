use thiserror::Error;

/// Errors produced while reading a bit stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// The stream ended before the value was complete
    #[error("Unexpected end of stream: needed {needed} more bits, {remaining} remaining")]
    UnexpectedEnd { needed: usize, remaining: usize },

    /// The bits were read but do not form a valid value of the target type
    #[error("Invalid value while reading {type_name}")]
    InvalidValue { type_name: &'static str },
}
