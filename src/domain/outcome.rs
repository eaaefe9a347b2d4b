//! Adapter call outcome types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Discriminant of an `Outcome`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeKind {
    Success,
    NoBalance,
    NoWallets,
    Error,
}

/// Result of one adapter call. Never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Transaction confirmed; detail is the transaction reference
    Success(String),
    /// Nothing to sell or unwrap - skipped without a transaction
    NoBalance,
    /// Empty recipient list - skipped without a transaction
    NoWallets,
    /// Call failed; detail is the error message
    Error(String),
}

impl Outcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::Success(_) => OutcomeKind::Success,
            Outcome::NoBalance => OutcomeKind::NoBalance,
            Outcome::NoWallets => OutcomeKind::NoWallets,
            Outcome::Error(_) => OutcomeKind::Error,
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            Outcome::Success(detail) | Outcome::Error(detail) => Some(detail),
            Outcome::NoBalance | Outcome::NoWallets => None,
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutcomeKind::Success => "Success",
            OutcomeKind::NoBalance => "NoBalance",
            OutcomeKind::NoWallets => "NoWallets",
            OutcomeKind::Error => "Error",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.detail() {
            Some(detail) => write!(f, "{} ({})", self.kind(), detail),
            None => write!(f, "{}", self.kind()),
        }
    }
}
