use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::auth::Authenticator;
use crate::client::Client;
use crate::protocol::responses::{self, format_response};
use crate::protocol::{Command, CommandStatus, handle_command, parse_command};

/// One line read from a client.
#[derive(Debug, PartialEq)]
pub enum LineRead {
    Eof,
    Line(Vec<u8>),
    /// The line exceeded the limit; its bytes were discarded.
    TooLong,
}

/// Reads one `\n`-terminated line, buffering at most `max_length + 1` bytes.
///
/// A final line without a newline before EOF is returned as a line.
pub async fn read_command_line<R>(
    reader: &mut R,
    max_length: usize,
    buf: &mut Vec<u8>,
) -> Result<LineRead, std::io::Error>
where
    R: AsyncBufRead + Unpin,
{
    let cap = max_length as u64 + 1;

    buf.clear();
    let n = (&mut *reader).take(cap).read_until(b'\n', buf).await?;
    if n == 0 {
        return Ok(LineRead::Eof);
    }
    if n <= max_length {
        return Ok(LineRead::Line(std::mem::take(buf)));
    }

    // Over the limit: drain the rest of the line in bounded chunks.
    while !buf.ends_with(b"\n") {
        buf.clear();
        if (&mut *reader).take(cap).read_until(b'\n', buf).await? == 0 {
            break;
        }
    }
    buf.clear();
    Ok(LineRead::TooLong)
}

/// Handles one client connection until it quits or disconnects.
///
/// - Reads command lines with a length cap via `read_command_line`.
/// - Dispatches commands using `handle_command`.
/// - Login state lives only in this task's `Client`.
pub async fn handle_client(
    cmd_stream: TcpStream,
    client_addr: SocketAddr,
    authenticator: Arc<Authenticator>,
    max_command_length: usize,
) -> Result<(), std::io::Error> {
    let (read_half, mut write_half) = cmd_stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut buf = Vec::new();
    let mut client = Client::new(client_addr);

    write_half
        .write_all(format_response(responses::READY, "Welcome to RAX auth server").as_bytes())
        .await?;
    write_half.flush().await?;

    loop {
        let bytes = match read_command_line(&mut reader, max_command_length, &mut buf).await {
            Ok(LineRead::Eof) => {
                info!("Connection closed by client {}", client_addr);
                break;
            }
            Ok(LineRead::TooLong) => {
                warn!("Discarded over-long command from {}", client_addr);
                write_half
                    .write_all(
                        format_response(responses::UNKNOWN_COMMAND, "Command too long").as_bytes(),
                    )
                    .await?;
                continue;
            }
            Ok(LineRead::Line(bytes)) => bytes,
            Err(e) => {
                error!("Failed to read from {}: {}", client_addr, e);
                return Err(e);
            }
        };

        let line = match String::from_utf8(bytes) {
            Ok(line) => line,
            Err(_) => {
                warn!("Received non UTF-8 command from {}", client_addr);
                write_half
                    .write_all(
                        format_response(responses::SYNTAX_ERROR_IN_ARGS, "Invalid command encoding")
                            .as_bytes(),
                    )
                    .await?;
                continue;
            }
        };

        let trimmed = line.trim_end_matches(['\r', '\n']);
        let command = parse_command(trimmed);
        log_command(client_addr, &command);

        let result = handle_command(&mut client, &command, &authenticator);
        if let Some(msg) = &result.message {
            write_half.write_all(msg.as_bytes()).await?;
        }

        if result.status == CommandStatus::CloseConnection {
            info!("Client {} requested to quit", client_addr);
            break;
        }
    }

    write_half.shutdown().await?;
    Ok(())
}

// Passwords never reach the log.
fn log_command(client_addr: SocketAddr, command: &Command) {
    match command {
        Command::PASS(_) => info!("Received from {}: PASS ****", client_addr),
        Command::REGISTER { username, .. } => {
            info!("Received from {}: REGISTER {}", client_addr, username)
        }
        other => info!("Received from {}: {:?}", client_addr, other),
    }
}
