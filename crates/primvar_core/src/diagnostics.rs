use serde::{Deserialize, Serialize};

/// Floor and iteration diagnostics of one or many conversions.
///
/// `Default` is the identity of [`ConversionDiagnostics::merge`], which is
/// associative and commutative, so any reduction order yields the same value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionDiagnostics {
    pub dfloor_used: bool,
    pub efloor_used: bool,
    pub max_iter: u32,
}

impl ConversionDiagnostics {
    pub fn merge(self, other: Self) -> Self {
        Self {
            dfloor_used: self.dfloor_used || other.dfloor_used,
            efloor_used: self.efloor_used || other.efloor_used,
            max_iter: self.max_iter.max(other.max_iter),
        }
    }

    pub fn record_iterations(&mut self, iterations: u32) {
        self.max_iter = self.max_iter.max(iterations);
    }

    pub fn any_floor_used(&self) -> bool {
        self.dfloor_used || self.efloor_used
    }
}

impl std::iter::Sum for ConversionDiagnostics {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Self::merge)
    }
}
