//! Syntax errors raised while scanning component tags and their attributes.
//!
//! Every variant records the attribute (or tag) it concerns and a byte offset.
//! Offsets are relative to the text handed to the failing parser; callers that
//! parse a sub-slice shift them with [`ParseError::shifted`] so the final error
//! points into the original file body.

use thiserror::Error;

/// Result alias used throughout the parser module.
pub type ParseResult<T> = Result<T, ParseError>;

/// Malformed attribute, tag or props syntax.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A quoted value has no closing quote.
    #[error("unterminated quoted value for attribute '{attribute}' at offset {offset}")]
    UnterminatedQuote {
        /// Attribute whose value is unterminated
        attribute: String,
        /// Offset of the opening quote
        offset: usize,
    },

    /// A braced value (`props={...}`) never returns to depth zero.
    #[error("unbalanced braces in value of attribute '{attribute}' at offset {offset}")]
    UnbalancedBrace {
        /// Attribute whose value is unbalanced
        attribute: String,
        /// Offset of the opening brace
        offset: usize,
    },

    /// `name=` followed by nothing.
    #[error("attribute '{attribute}' has '=' but no value at offset {offset}")]
    MissingValue {
        /// Attribute missing its value
        attribute: String,
        /// Offset where the value was expected
        offset: usize,
    },

    /// A character that cannot start an attribute name.
    #[error("unexpected character '{found}' at offset {offset}")]
    UnexpectedCharacter {
        /// The offending character
        found: char,
        /// Offset of the character
        offset: usize,
    },

    /// A component tag runs to the end of input without `/>`.
    #[error("component tag <{tag}> opened at offset {offset} is never closed")]
    UnterminatedTag {
        /// Component identifier
        tag: String,
        /// Offset of the opening `<`
        offset: usize,
    },

    /// Known components must be written as `<Name ... />`.
    #[error("component <{tag}> at offset {offset} must be self-closing (<{tag} ... />)")]
    UnsupportedClosingTag {
        /// Component identifier
        tag: String,
        /// Offset of the opening `<`
        offset: usize,
    },

    /// The props expression could not be parsed or evaluated.
    #[error("invalid props expression for attribute '{attribute}' at offset {offset}: {message}")]
    InvalidProps {
        /// Attribute carrying the expression (normally `props`)
        attribute: String,
        /// Offset of the failure inside the expression
        offset: usize,
        /// What went wrong
        message: String,
    },
}

impl ParseError {
    /// Byte offset of the failure.
    #[must_use]
    pub fn offset(&self) -> usize {
        match self {
            Self::UnterminatedQuote {
                offset,
                ..
            }
            | Self::UnbalancedBrace {
                offset,
                ..
            }
            | Self::MissingValue {
                offset,
                ..
            }
            | Self::UnexpectedCharacter {
                offset,
                ..
            }
            | Self::UnterminatedTag {
                offset,
                ..
            }
            | Self::UnsupportedClosingTag {
                offset,
                ..
            }
            | Self::InvalidProps {
                offset,
                ..
            } => *offset,
        }
    }

    /// Attribute or tag name the error concerns, if any.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        match self {
            Self::UnterminatedQuote {
                attribute,
                ..
            }
            | Self::UnbalancedBrace {
                attribute,
                ..
            }
            | Self::MissingValue {
                attribute,
                ..
            }
            | Self::InvalidProps {
                attribute,
                ..
            } => Some(attribute),
            Self::UnterminatedTag {
                tag,
                ..
            }
            | Self::UnsupportedClosingTag {
                tag,
                ..
            } => Some(tag),
            Self::UnexpectedCharacter {
                ..
            } => None,
        }
    }

    /// Move the offset forward by `by` bytes.
    #[must_use]
    pub fn shifted(mut self, by: usize) -> Self {
        match &mut self {
            Self::UnterminatedQuote {
                offset,
                ..
            }
            | Self::UnbalancedBrace {
                offset,
                ..
            }
            | Self::MissingValue {
                offset,
                ..
            }
            | Self::UnexpectedCharacter {
                offset,
                ..
            }
            | Self::UnterminatedTag {
                offset,
                ..
            }
            | Self::UnsupportedClosingTag {
                offset,
                ..
            }
            | Self::InvalidProps {
                offset,
                ..
            } => *offset += by,
        }
        self
    }
}
