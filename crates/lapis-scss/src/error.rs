//! Error types for stylesheet and selector parsing.

use lapis_common::SourcePosition;
use thiserror::Error;

/// Error produced while parsing stylesheet or selector text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A token appeared where the grammar does not allow it.
    #[error("{position}: unexpected {found}")]
    UnexpectedToken {
        /// Description of the offending token.
        found: String,
        /// Where the token starts.
        position: SourcePosition,
    },

    /// The input ended inside a construct.
    #[error("{position}: unexpected end of input, expected {expected}")]
    UnexpectedEof {
        /// What the parser was looking for.
        expected: String,
        /// Where the unfinished construct starts.
        position: SourcePosition,
    },

    /// Selector text that the selector grammar rejects.
    #[error("{position}: invalid selector \"{text}\": {reason}")]
    InvalidSelector {
        /// The selector text as given to the grammar.
        text: String,
        /// What is wrong with it.
        reason: String,
        /// Where the problem was found.
        position: SourcePosition,
    },
}

impl ParseError {
    /// The source position the error points at.
    #[must_use]
    pub const fn position(&self) -> SourcePosition {
        match self {
            Self::UnexpectedToken { position, .. }
            | Self::UnexpectedEof { position, .. }
            | Self::InvalidSelector { position, .. } => *position,
        }
    }
}
