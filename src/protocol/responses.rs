//! Response handling
//!
//! Defines reply codes and formatting.

/// Reply codes
pub const SYSTEM_STATUS: u16 = 211;
pub const READY: u16 = 220;
pub const CLOSING: u16 = 221;
pub const LOGIN_SUCCESS: u16 = 230;
pub const ACTION_OK: u16 = 250;
pub const PASSWORD_REQUIRED: u16 = 331;
pub const SERVICE_UNAVAILABLE: u16 = 421;
pub const UNKNOWN_COMMAND: u16 = 500;
pub const SYNTAX_ERROR_IN_ARGS: u16 = 501;
pub const BAD_SEQUENCE: u16 = 503;
pub const NOT_LOGGED_IN: u16 = 530;
pub const ACTION_NOT_TAKEN: u16 = 550;

/// Format a reply line
pub fn format_response(code: u16, message: &str) -> String {
    format!("{} {}\r\n", code, message)
}
