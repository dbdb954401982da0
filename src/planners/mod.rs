pub mod features;
pub mod rollout;

pub use features::{EvalMode, FeatureMap, evaluate, extract_features, weights_for};
pub use rollout::{DEFAULT_DEPTH, DEFAULT_REPETITIONS, RolloutPlanner};
