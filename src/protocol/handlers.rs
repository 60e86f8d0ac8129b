//! Command handlers module for the Rax auth server.
//!
//! Each handler updates the per-connection [`Client`] state and produces the
//! reply line for the command.

use log::{info, warn};

use crate::auth::Authenticator;
use crate::client::Client;
use crate::error::handlers::auth_error_code;
use crate::protocol::responses::{self, format_response};
use crate::protocol::{Command, CommandResult, CommandStatus};

/// Dispatches a parsed command to its handler.
///
/// # Arguments
///
/// * `client` - Mutable reference to the client sending the command.
/// * `command` - Reference to the parsed command.
/// * `authenticator` - Shared authenticator backing USER/PASS/REGISTER.
///
/// # Returns
///
/// * `CommandResult` - Status of the command and the reply to send.
pub fn handle_command(
    client: &mut Client,
    command: &Command,
    authenticator: &Authenticator,
) -> CommandResult {
    match command {
        Command::QUIT => handle_cmd_quit(client),
        Command::USER(username) => handle_cmd_user(client, username),
        Command::PASS(password) => handle_cmd_pass(client, password, authenticator),
        Command::REGISTER {
            username,
            email,
            password,
        } => handle_cmd_register(client, username, email, password, authenticator),
        Command::WHOAMI => handle_cmd_whoami(client),
        Command::LOGOUT => handle_cmd_logout(client),
        Command::UNKNOWN => handle_cmd_unknown(),
    }
}

fn success(code: u16, message: &str) -> CommandResult {
    CommandResult {
        status: CommandStatus::Success,
        message: Some(format_response(code, message)),
    }
}

fn failure(code: u16, message: &str) -> CommandResult {
    CommandResult {
        status: CommandStatus::Failure(message.to_string()),
        message: Some(format_response(code, message)),
    }
}

/// Handles the QUIT command: logs out the client and signals connection close.
fn handle_cmd_quit(client: &mut Client) -> CommandResult {
    client.logout();

    CommandResult {
        status: CommandStatus::CloseConnection,
        message: Some(format_response(responses::CLOSING, "Goodbye")),
    }
}

/// Handles the USER command.
///
/// Always asks for a password so that a client cannot probe which usernames exist.
fn handle_cmd_user(client: &mut Client, username: &str) -> CommandResult {
    client.set_pending_username(Some(username.to_string()));
    success(responses::PASSWORD_REQUIRED, "Password required")
}

/// Handles the PASS command against the username given by USER.
fn handle_cmd_pass(
    client: &mut Client,
    password: &str,
    authenticator: &Authenticator,
) -> CommandResult {
    let Some(username) = client.pending_username().map(str::to_string) else {
        return failure(responses::BAD_SEQUENCE, "Send USER first");
    };

    match authenticator.authenticate(&username, password) {
        Some(user) => {
            client.set_user(Some(user));
            success(responses::LOGIN_SUCCESS, "Login successful")
        }
        None => {
            client.set_user(None);
            failure(responses::NOT_LOGGED_IN, "Login incorrect")
        }
    }
}

/// Handles the REGISTER command.
///
/// An existing username can only be re-registered by a client logged in as
/// that user; the session then follows the replaced record.
fn handle_cmd_register(
    client: &mut Client,
    username: &str,
    email: &str,
    password: &str,
    authenticator: &Authenticator,
) -> CommandResult {
    let is_self = client.user().is_some_and(|user| user.username == username);
    if !is_self && authenticator.store().contains(username) {
        warn!("Refused REGISTER over existing user {}", username);
        return failure(responses::ACTION_NOT_TAKEN, "User already exists");
    }

    match authenticator.register(username, email, password) {
        Ok(user) => {
            let id = user.id;
            if is_self {
                client.set_user(Some(user));
            }
            success(responses::ACTION_OK, &format!("User registered (id {})", id))
        }
        Err(e) => {
            info!("Registration rejected: {}", e);
            failure(auth_error_code(&e), &e.to_string())
        }
    }
}

fn handle_cmd_whoami(client: &Client) -> CommandResult {
    match client.user() {
        Some(user) => success(
            responses::SYSTEM_STATUS,
            &format!("{} {} {}", user.id, user.username, user.email),
        ),
        None => failure(responses::NOT_LOGGED_IN, "Not logged in"),
    }
}

fn handle_cmd_logout(client: &mut Client) -> CommandResult {
    if !client.is_logged_in() {
        return failure(responses::NOT_LOGGED_IN, "Not logged in");
    }

    client.logout();
    success(responses::CLOSING, "Logout successful")
}

fn handle_cmd_unknown() -> CommandResult {
    failure(responses::UNKNOWN_COMMAND, "Unknown command")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{CredentialStore, InputLimits};
    use crate::protocol::parse_command;
    use std::sync::Arc;

    fn setup() -> (Client, Authenticator) {
        let auth = Authenticator::new(Arc::new(CredentialStore::new()), InputLimits::default());
        auth.register("alice", "alice@example.com", "secret1").unwrap();
        (Client::default(), auth)
    }

    fn send(client: &mut Client, auth: &Authenticator, line: &str) -> String {
        let result = handle_command(client, &parse_command(line), auth);
        result.message.unwrap_or_default().trim_end().to_string()
    }

    #[test]
    fn test_login_success() {
        let (mut client, auth) = setup();
        assert_eq!(send(&mut client, &auth, "USER alice"), "331 Password required");
        assert_eq!(send(&mut client, &auth, "PASS secret1"), "230 Login successful");
        assert!(client.is_logged_in());
        assert_eq!(
            send(&mut client, &auth, "WHOAMI"),
            "211 1 alice alice@example.com"
        );
    }

    #[test]
    fn test_wrong_password_and_unknown_user_look_alike() {
        let (mut client, auth) = setup();
        assert_eq!(send(&mut client, &auth, "USER alice"), "331 Password required");
        let wrong = send(&mut client, &auth, "PASS wrongpass");

        assert_eq!(send(&mut client, &auth, "USER nonexistent"), "331 Password required");
        let unknown = send(&mut client, &auth, "PASS anything");

        assert_eq!(wrong, "530 Login incorrect");
        assert_eq!(wrong, unknown);
        assert!(!client.is_logged_in());
    }

    #[test]
    fn test_pass_requires_user() {
        let (mut client, auth) = setup();
        assert_eq!(send(&mut client, &auth, "PASS secret1"), "503 Send USER first");

        send(&mut client, &auth, "USER alice");
        send(&mut client, &auth, "PASS wrongpass");
        // A failed PASS consumes the pending username.
        assert_eq!(send(&mut client, &auth, "PASS secret1"), "503 Send USER first");
    }

    #[test]
    fn test_register_then_login() {
        let (mut client, auth) = setup();
        assert_eq!(
            send(&mut client, &auth, "REGISTER bob bob@example.com hunter 2"),
            "250 User registered (id 2)"
        );
        send(&mut client, &auth, "USER bob");
        assert_eq!(send(&mut client, &auth, "PASS hunter 2"), "230 Login successful");
    }

    #[test]
    fn test_register_refuses_existing_user_when_anonymous() {
        let (mut client, auth) = setup();
        assert_eq!(
            send(&mut client, &auth, "REGISTER alice evil@example.com pwned"),
            "550 User already exists"
        );
        assert!(auth.authenticate("alice", "pwned").is_none());
        assert!(auth.authenticate("alice", "secret1").is_some());
    }

    #[test]
    fn test_register_refuses_existing_user_when_logged_in_as_other() {
        let (mut client, auth) = setup();
        auth.register("bob", "bob@example.com", "bobpw").unwrap();
        send(&mut client, &auth, "USER bob");
        send(&mut client, &auth, "PASS bobpw");
        assert_eq!(
            send(&mut client, &auth, "REGISTER alice evil@example.com pwned"),
            "550 User already exists"
        );
        assert!(auth.authenticate("alice", "secret1").is_some());
    }

    #[test]
    fn test_register_self_rotates_password() {
        let (mut client, auth) = setup();
        send(&mut client, &auth, "USER alice");
        send(&mut client, &auth, "PASS secret1");
        assert_eq!(
            send(&mut client, &auth, "REGISTER alice alice@new.example.com secret2"),
            "250 User registered (id 2)"
        );
        assert_eq!(
            send(&mut client, &auth, "WHOAMI"),
            "211 2 alice alice@new.example.com"
        );
        assert!(auth.authenticate("alice", "secret1").is_none());
        assert!(auth.authenticate("alice", "secret2").is_some());
    }

    #[test]
    fn test_register_rejects_invalid_email() {
        let (mut client, auth) = setup();
        assert_eq!(
            send(&mut client, &auth, "REGISTER bob nope pw"),
            "501 Invalid email: nope"
        );
        assert!(!auth.store().contains("bob"));
    }

    #[test]
    fn test_logout() {
        let (mut client, auth) = setup();
        assert_eq!(send(&mut client, &auth, "LOGOUT"), "530 Not logged in");
        send(&mut client, &auth, "USER alice");
        send(&mut client, &auth, "PASS secret1");
        assert_eq!(send(&mut client, &auth, "LOGOUT"), "221 Logout successful");
        assert_eq!(send(&mut client, &auth, "WHOAMI"), "530 Not logged in");
    }

    #[test]
    fn test_quit_and_unknown() {
        let (mut client, auth) = setup();
        assert_eq!(send(&mut client, &auth, "NOPE"), "500 Unknown command");

        let result = handle_command(&mut client, &Command::QUIT, &auth);
        assert_eq!(result.status, CommandStatus::CloseConnection);
    }
}
