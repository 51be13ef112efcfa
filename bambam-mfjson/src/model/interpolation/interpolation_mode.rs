use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// how consumers should interpolate between two consecutive values.
/// serialized with the exact MF-JSON spelling.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Interpolation {
    /// continuous; values between two samples lie on a straight line
    Linear,
    /// step-wise; a value holds until the next sample
    Discrete,
}

impl Display for Interpolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Interpolation::Linear => write!(f, "Linear"),
            Interpolation::Discrete => write!(f, "Discrete"),
        }
    }
}
