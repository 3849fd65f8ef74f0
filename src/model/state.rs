/// Marker for a model that is **not yet trained**.
///
/// `Trainer::fit` consumes a `LogisticModel<B, Unfitted>`; prediction methods
/// are only available once it has become `Fitted`.
#[derive(Debug, Clone, Copy)]
pub struct Unfitted;

/// Marker for a **trained** model.
///
/// A fitted model holds only inference parameters: no optimizer state, loss
/// or training hyperparameters.
#[derive(Debug, Clone, Copy)]
pub struct Fitted;
