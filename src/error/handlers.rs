//! Error handlers
//!
//! Logging and reply-code mapping for errors.

use crate::error::types::{AuthError, ServerError};
use crate::protocol::responses;
use log::error;

/// Log a server error
pub fn handle_error(err: &ServerError) {
    error!("Auth Server Error: {}", err);
}

/// Convert a registration error to its reply code
pub fn auth_error_code(err: &AuthError) -> u16 {
    match err {
        AuthError::InvalidUsername(_) | AuthError::InvalidEmail(_) | AuthError::MalformedInput(_) => {
            responses::SYNTAX_ERROR_IN_ARGS
        }
    }
}
