use thiserror::Error;

/// Error raised when a string cannot be represented in a target encoding.
///
/// The repair search treats this as a soft signal: the candidate step that
/// produced it is discarded and the search moves on. It is public so that
/// callers driving [`crate::Encoding`](crate::Encoding) directly can inspect
/// failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("character {ch:?} at offset {offset} cannot be encoded as {encoding}")]
pub struct EncodeError {
    /// The character that has no byte in the target encoding.
    pub ch: char,
    /// Char offset of the failure within the input.
    pub offset: usize,
    /// Name of the encoding that rejected the character.
    pub encoding: &'static str,
}

/// Error raised when bytes do not form valid text in a source encoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("byte 0x{byte:02X} at offset {offset} is not valid {encoding}")]
pub struct DecodeError {
    /// The first offending byte.
    pub byte: u8,
    /// Byte offset of the failure within the input.
    pub offset: usize,
    /// Name of the encoding that rejected the byte.
    pub encoding: &'static str,
}
