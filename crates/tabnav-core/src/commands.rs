//! Remote command channel: the four history messages a page script may
//! send to its controller.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tabnav_types::error::{NavError, Result};

use crate::controller::NavigationController;
use crate::surface::Surface;

/// A history request arriving over the command channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavCommand {
    GoBack,
    GoForward,
    GoToOffset { offset: isize },
    /// Synchronous query; replied to with [`CommandReply::Length`].
    Length,
}

/// Reply sent back over the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CommandReply {
    Ack,
    Length(usize),
}

impl NavCommand {
    /// Decode a JSON message, e.g. `{"type":"go_to_offset","offset":-1}`.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

impl FromStr for NavCommand {
    type Err = NavError;

    /// Parse a text line: `back`, `forward`, `go <offset>` or `length`.
    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let cmd = match (words.next(), words.next()) {
            (Some("back"), None) => Self::GoBack,
            (Some("forward"), None) => Self::GoForward,
            (Some("length"), None) => Self::Length,
            (Some("go"), Some(arg)) => {
                let offset = arg
                    .parse()
                    .map_err(|_| NavError::Command(format!("bad offset: {arg}")))?;
                Self::GoToOffset { offset }
            },
            _ => return Err(NavError::Command(format!("unknown command: {line}"))),
        };
        if words.next().is_some() {
            return Err(NavError::Command(format!("trailing arguments: {line}")));
        }
        Ok(cmd)
    }
}

impl<S: Surface> NavigationController<S> {
    /// Forward a channel command to the matching history operation.
    pub fn execute(&mut self, cmd: NavCommand) -> CommandReply {
        log::debug!("Channel command {cmd:?}");
        match cmd {
            NavCommand::GoBack => self.go_back(),
            NavCommand::GoForward => self.go_forward(),
            NavCommand::GoToOffset { offset } => self.go_to_offset(offset),
            NavCommand::Length => return CommandReply::Length(self.length()),
        }
        CommandReply::Ack
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::LoadOptions;
    use crate::test_utils::{RecordingSurface, SurfaceCall, commit};

    #[test]
    fn parse_text_lines() {
        assert_eq!("back".parse::<NavCommand>().unwrap(), NavCommand::GoBack);
        assert_eq!(" forward ".parse::<NavCommand>().unwrap(), NavCommand::GoForward);
        assert_eq!("length".parse::<NavCommand>().unwrap(), NavCommand::Length);
        assert_eq!(
            "go -2".parse::<NavCommand>().unwrap(),
            NavCommand::GoToOffset { offset: -2 }
        );
    }

    #[test]
    fn reject_malformed_lines() {
        for line in ["", "sideways", "go", "go x", "back now", "go 1 2"] {
            let err = line.parse::<NavCommand>().unwrap_err();
            assert!(matches!(err, NavError::Command(_)), "{line:?}");
        }
    }

    #[test]
    fn decode_json_messages() {
        assert_eq!(
            NavCommand::from_json(r#"{"type":"go_to_offset","offset":-1}"#).unwrap(),
            NavCommand::GoToOffset { offset: -1 }
        );
        assert_eq!(
            NavCommand::from_json(r#"{"type":"length"}"#).unwrap(),
            NavCommand::Length
        );
        let err = NavCommand::from_json(r#"{"type":"reload"}"#).unwrap_err();
        assert!(matches!(err, NavError::Json(_)));
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn reply_encoding() {
        let json = serde_json::to_string(&CommandReply::Length(3)).unwrap();
        assert_eq!(json, r#"{"type":"length","value":3}"#);
        let json = serde_json::to_string(&CommandReply::Ack).unwrap();
        assert_eq!(json, r#"{"type":"ack"}"#);
    }

    #[test]
    fn execute_forwards_to_history() {
        let mut nav = NavigationController::new(RecordingSurface::new());
        nav.handle_event(&commit("https://x/1", false, false));
        nav.handle_event(&commit("https://x/2", false, false));

        assert_eq!(nav.execute(NavCommand::Length), CommandReply::Length(2));
        assert_eq!(nav.execute(NavCommand::GoBack), CommandReply::Ack);
        assert_eq!(
            nav.surface().last_call(),
            Some(&SurfaceCall::Navigate {
                url: "https://x/1".into(),
                options: LoadOptions::default(),
            })
        );
        nav.handle_event(&commit("https://x/1", false, false));
        assert_eq!(
            nav.execute(NavCommand::GoToOffset { offset: 1 }),
            CommandReply::Ack
        );
        assert_eq!(nav.active_index(), Some(1));
    }

    #[test]
    fn execute_ignores_invalid_offsets() {
        let mut nav = NavigationController::new(RecordingSurface::new());
        assert_eq!(
            nav.execute(NavCommand::GoToOffset { offset: -5 }),
            CommandReply::Ack
        );
        assert_eq!(nav.execute(NavCommand::GoForward), CommandReply::Ack);
        assert!(nav.surface().calls.is_empty());
    }
}
