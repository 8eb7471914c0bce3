//! Error types for the batching core.

use std::fmt;

use crate::messaging::MessageId;

/// Errors raised by the pull/push messaging fabric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagingError {
    /// A pull responder is already registered for this request id.
    ResponderAlreadyRegistered { id: MessageId },

    /// Nothing answers pulls for this request id.
    NoResponder { id: MessageId },
}

impl fmt::Display for MessagingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessagingError::ResponderAlreadyRegistered { id } => {
                write!(f, "A pull responder is already registered for request {}", id)
            }
            MessagingError::NoResponder { id } => {
                write!(f, "No pull responder is registered for request {}", id)
            }
        }
    }
}

impl std::error::Error for MessagingError {}

/// Errors raised at the renderer's front door.
///
/// Every variant is a caller bug detected at the call site; none of them are
/// transient and none are retried.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// A render or end call was made without a preceding `begin()`.
    NotBegun {
        /// The operation that was attempted.
        operation: &'static str,
    },

    /// The texture handle is empty (id 0 or zero-sized).
    NullTexture,

    /// The font's atlas texture is empty.
    NullFont,

    /// The source rectangle of a textured draw has no area.
    InvalidSourceRect { width: f32, height: f32 },

    /// The renderer configuration is unusable.
    InvalidConfig(String),

    /// Wiring the renderer into the messaging fabric failed.
    Messaging(MessagingError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NotBegun { operation } => write!(
                f,
                "The begin() method must be invoked first before calling {}()",
                operation
            ),
            RenderError::NullTexture => write!(f, "Cannot render a null texture"),
            RenderError::NullFont => write!(f, "Cannot render a null font"),
            RenderError::InvalidSourceRect { width, height } => write!(
                f,
                "The source rectangle must have a width and height greater than zero (got {}x{})",
                width, height
            ),
            RenderError::InvalidConfig(msg) => write!(f, "Invalid renderer configuration: {}", msg),
            RenderError::Messaging(err) => write!(f, "Messaging error: {}", err),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Messaging(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MessagingError> for RenderError {
    fn from(err: MessagingError) -> Self {
        RenderError::Messaging(err)
    }
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Result type for messaging operations.
pub type MessagingResult<T> = Result<T, MessagingError>;
