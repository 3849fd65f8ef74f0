//! Feature scaling.
//!
//! Logistic regression trained by plain gradient descent is sensitive to
//! feature scale, so features are standardized with statistics learned on the
//! training split before any model sees them.

pub mod standard;

pub use standard::{FittedStandardScaler, StandardScaler, StandardScalerParams};
