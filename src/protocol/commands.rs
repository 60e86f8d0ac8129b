//! Module `command`
//!
//! Defines the command parsing logic and the data structures used to
//! represent commands and their results.

/// A command parsed from a client line.
///
/// Commands that require arguments store them in the variant. A known
/// command with missing arguments parses as `UNKNOWN`.
#[derive(Debug, PartialEq)]
pub enum Command {
    QUIT,
    LOGOUT,
    WHOAMI,
    USER(String), // Username for login
    PASS(String), // Password for login
    REGISTER {
        username: String,
        email: String,
        password: String,
    },
    UNKNOWN,
}

/// Represents the outcome status of executing a command.
#[derive(Debug, PartialEq)]
pub enum CommandStatus {
    Success,
    Failure(String),
    CloseConnection,
}

/// Struct encapsulating the full result of a command execution.
#[derive(Debug)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: Option<String>,
}

/// Parses a raw line received from a client into a `Command`.
pub fn parse_command(raw: &str) -> Command {
    let trimmed = raw.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or("").to_ascii_uppercase();
    let arg = parts.next().unwrap_or("").trim();

    match cmd.as_str() {
        "QUIT" | "Q" => Command::QUIT,
        "LOGOUT" => Command::LOGOUT,
        "WHOAMI" => Command::WHOAMI,
        "USER" if !arg.is_empty() => Command::USER(arg.to_string()),
        "PASS" if !arg.is_empty() => Command::PASS(arg.to_string()),
        "REGISTER" => parse_register(arg),
        _ => Command::UNKNOWN,
    }
}

// REGISTER <username> <email> <password...>; the password keeps inner spaces.
fn parse_register(arg: &str) -> Command {
    let mut parts = arg.splitn(3, char::is_whitespace);
    let username = parts.next().unwrap_or("");
    let email = parts.next().unwrap_or("");
    let password = parts.next().unwrap_or("").trim();

    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Command::UNKNOWN;
    }

    Command::REGISTER {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    }
}
