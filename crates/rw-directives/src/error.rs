//! Directive recognition errors.

/// Reason a start fence does not open a directive.
///
/// These never leave the engine: the occurrence is left as ordinary text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectiveError {
    /// No directive registered under this name.
    #[error("unknown directive '{0}'")]
    UnknownDirective(String),
    /// Fence shorter than the directive's minimum.
    #[error("fence of length {length} is shorter than the minimum {min} for '{name}'")]
    FenceTooShort {
        /// Directive name.
        name: String,
        /// Fence length found.
        length: usize,
        /// Minimum fence length.
        min: usize,
    },
    /// Wrong number of positional arguments.
    #[error("expected {min}..={max} arguments, got {found}")]
    Arity {
        /// Required argument count.
        min: usize,
        /// Maximum argument count.
        max: usize,
        /// Arguments found.
        found: usize,
    },
    /// Header key that the directive does not declare.
    #[error("unknown option '{0}'")]
    UnknownOption(String),
    /// Option value rejected by its converter.
    #[error("invalid value '{value}' for option '{name}'")]
    InvalidOption {
        /// Option name.
        name: String,
        /// Rejected value.
        value: String,
    },
    /// Argument rejected by the directive.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
