//! Serialization of fitted parameters.
//!
//! Fitted types expose a plain-data parameter record (weights, normalization
//! statistics, label classes) that is independent of the backend's tensor
//! types and can be written to bytes with `bincode`.

use std::error::Error;

/// A parameter record that can be serialized to and from bytes.
///
/// Implementors hold only plain numerical or textual data, never backend
/// tensors.
pub trait SerializableParams: Sized {
    /// The error type returned during (de)serialization.
    type Error: Error + Send + Sync + 'static;

    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error>;

    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error>;
}

impl<T> SerializableParams for T
where
    T: serde::Serialize + for<'de> serde::Deserialize<'de>,
{
    type Error = bincode::Error;

    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error> {
        bincode::serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        bincode::deserialize(bytes)
    }
}
