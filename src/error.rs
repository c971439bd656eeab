//! Errors surfaced by the backend client and the configuration layer
//!
//! Route resolution has its own error type in [`crate::resolver`]; those
//! failures never leave the engine.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GreenRouteError {
    /// Settings that cannot be used as given
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The route backend failed or answered with something unusable
    #[error("API error: {message}")]
    Api { message: String },

    /// Input rejected before any request was sent
    #[error("Invalid input: {message}")]
    Validation { message: String },
}

impl GreenRouteError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Message for the end user, with a hint on what to check
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            GreenRouteError::Config { message } => {
                format!("{message}. Check the config file and GREENROUTE__* variables.")
            }
            GreenRouteError::Api { message } => {
                format!("{message}. Is the route backend reachable?")
            }
            GreenRouteError::Validation { message } => format!("Invalid input: {message}"),
        }
    }
}
