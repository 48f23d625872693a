//! Confidence-banded verdicts over the classifier's probability vector.

mod class;
mod resolve;

pub use class::{Emphasis, TissueClass, UNKNOWN_RESULT};
pub use resolve::{
    argmax, describe_label, resolve, ConfidenceBand, Verdict, CONFIDENT_ABOVE, INVALID_BELOW,
};
