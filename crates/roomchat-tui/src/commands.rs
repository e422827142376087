//! Slash-command parsing.
//!
//! | Input              | Command                           |
//! |--------------------|-----------------------------------|
//! | `/create`          | allocate a room from the server   |
//! | `/new`             | room with a locally generated id  |
//! | `/join <code>`     | join a room by code               |
//! | `/open <url>`      | open a room page link             |
//! | `/copy`            | copy the room link                |
//! | `/reconnect`       | reconnect after a disconnect      |
//! | `/leave`           | back to the landing page          |
//! | `/quit`            | exit                              |
//! | `//text`           | send `/text` as a message         |
//! | anything else      | message (room) or code (landing)  |

use roomchat_app::Command;
use thiserror::Error;
use url::Url;

/// Why a line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Unrecognized `/command`.
    #[error("Unknown command: /{0}")]
    Unknown(String),

    /// A required argument was not given.
    #[error("/{command}: missing {argument}")]
    MissingArgument {
        /// Command name.
        command: &'static str,
        /// Argument name.
        argument: &'static str,
    },

    /// `/open` argument is not a URL.
    #[error("/open: {0}")]
    InvalidUrl(String),
}

/// What an entered line means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Nothing to do.
    Empty,
    /// A slash command.
    Command(Command),
    /// Free text; meaning depends on the current page.
    Text(String),
}

/// Parse one entered line.
pub fn parse(input: &str) -> Result<Line, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Line::Empty);
    }

    if let Some(escaped) = trimmed.strip_prefix("//") {
        return Ok(Line::Text(format!("/{escaped}")));
    }

    let Some(rest) = trimmed.strip_prefix('/') else {
        return Ok(Line::Text(trimmed.to_owned()));
    };

    let (name, argument) = match rest.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (rest, ""),
    };

    let command = match name {
        "create" => Command::CreateRoom,
        "new" => Command::CreateLocalRoom,
        "join" => {
            if argument.is_empty() {
                return Err(ParseError::MissingArgument { command: "join", argument: "room code" });
            }
            Command::JoinRoom(argument.to_owned())
        },
        "open" => {
            if argument.is_empty() {
                return Err(ParseError::MissingArgument { command: "open", argument: "room link" });
            }
            let url = Url::parse(argument).map_err(|e| ParseError::InvalidUrl(e.to_string()))?;
            Command::OpenRoom(url)
        },
        "copy" => Command::CopyRoomLink,
        "reconnect" => Command::Reconnect,
        "leave" => Command::LeaveRoom,
        "quit" | "q" => Command::Quit,
        other => return Err(ParseError::Unknown(other.to_owned())),
    };

    Ok(Line::Command(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_trimmed() {
        assert_eq!(parse("  hello  "), Ok(Line::Text("hello".into())));
        assert_eq!(parse("   "), Ok(Line::Empty));
    }

    #[test]
    fn commands_without_arguments() {
        assert_eq!(parse("/create"), Ok(Line::Command(Command::CreateRoom)));
        assert_eq!(parse("/new"), Ok(Line::Command(Command::CreateLocalRoom)));
        assert_eq!(parse("/copy"), Ok(Line::Command(Command::CopyRoomLink)));
        assert_eq!(parse("/reconnect"), Ok(Line::Command(Command::Reconnect)));
        assert_eq!(parse("/leave"), Ok(Line::Command(Command::LeaveRoom)));
        assert_eq!(parse("/q"), Ok(Line::Command(Command::Quit)));
    }

    #[test]
    fn join_takes_code() {
        assert_eq!(parse("/join  a3f9c1 "), Ok(Line::Command(Command::JoinRoom("a3f9c1".into()))));
        assert_eq!(
            parse("/join"),
            Err(ParseError::MissingArgument { command: "join", argument: "room code" })
        );
    }

    #[test]
    fn open_takes_url() {
        let parsed = parse("/open http://localhost:8000/room.html?room=a3f9c1").unwrap();
        let Line::Command(Command::OpenRoom(url)) = parsed else {
            panic!("expected OpenRoom, got {parsed:?}");
        };
        assert_eq!(url.query(), Some("room=a3f9c1"));

        assert!(matches!(parse("/open nope"), Err(ParseError::InvalidUrl(_))));
    }

    #[test]
    fn double_slash_escapes() {
        assert_eq!(parse("//shrug"), Ok(Line::Text("/shrug".into())));
    }

    #[test]
    fn unknown_command() {
        let err = parse("/dance now").unwrap_err();
        assert_eq!(err.to_string(), "Unknown command: /dance");
    }
}
