//! Label encoding.
//!
//! Maps a categorical target column onto integer class codes `0, 1, …`.
//! The class domain comes from the whole column, so a class that is absent
//! from one split keeps its code.

pub mod label;

pub use label::{LabelEncoder, LabelMap, LabelMapParams};
