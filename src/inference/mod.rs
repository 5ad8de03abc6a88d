// Inference module - classifier boundary, registry and ensemble gating
//
// Model loading and execution live outside this crate. Hosts implement
// `Classifier` for whatever runtime they use, register instances in a
// caller-owned `ModelRegistry`, and pass the registry by reference.

pub mod ensemble;
pub mod prediction;
pub mod registry;

pub use ensemble::{gate_opens, run_ensemble, EnsembleReport};
pub use prediction::Prediction;
pub use registry::{Classifier, ModelRegistry};
