//! Per-group confirmation contract.

use super::Decision;
use serde::{Deserialize, Serialize};

/// A reviewer's answer for one group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confirmation {
    /// Execute this group
    Proceed,
    /// Leave this group alone and continue
    Skip,
    /// Leave this and every later group alone
    SkipRemaining,
    /// Stop the run
    Quit,
}

impl Confirmation {
    /// Whether no further groups should be offered
    pub fn stops(&self) -> bool {
        matches!(self, Confirmation::SkipRemaining | Confirmation::Quit)
    }
}

/// Asked about each decision before it is executed
///
/// `position` is zero-based; `total` is the number of decisions in the run.
pub trait Reviewer {
    fn review(&mut self, decision: &Decision, position: usize, total: usize) -> Confirmation;
}

impl<F> Reviewer for F
where
    F: FnMut(&Decision, usize, usize) -> Confirmation,
{
    fn review(&mut self, decision: &Decision, position: usize, total: usize) -> Confirmation {
        self(decision, position, total)
    }
}

/// Approves every decision without asking
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprove;

impl Reviewer for AutoApprove {
    fn review(&mut self, _decision: &Decision, _position: usize, _total: usize) -> Confirmation {
        Confirmation::Proceed
    }
}
