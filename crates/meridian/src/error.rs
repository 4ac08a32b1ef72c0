//! Error type for layout operations.
//!
//! The engine has exactly one failure mode: the selected algorithm needs an
//! auxiliary key that the configuration does not provide (and that cannot be
//! derived from the graph). Every other irregular input has a documented
//! fallback in the algorithm itself.

use thiserror::Error;

use crate::config::LayoutKind;

/// A layout did not run because its configuration is incomplete.
///
/// The variants carry enough information for a UI to prompt for the missing
/// field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("{algorithm} layout requires `{key}` to be set")]
    MissingKey {
        algorithm: LayoutKind,
        key: &'static str,
    },

    #[error("{algorithm} layout root `{root}` is not a node of the graph")]
    UnknownRoot { algorithm: LayoutKind, root: String },
}

impl ConfigurationError {
    /// Create a new `MissingKey` error.
    pub fn missing_key(algorithm: LayoutKind, key: &'static str) -> Self {
        Self::MissingKey { algorithm, key }
    }

    /// Returns the algorithm whose configuration is incomplete.
    pub fn algorithm(&self) -> LayoutKind {
        match self {
            Self::MissingKey { algorithm, .. } | Self::UnknownRoot { algorithm, .. } => *algorithm,
        }
    }

    /// Returns the configuration key the caller has to fix.
    pub fn key(&self) -> &'static str {
        match self {
            Self::MissingKey { key, .. } => key,
            Self::UnknownRoot { .. } => "root_node_id",
        }
    }
}
