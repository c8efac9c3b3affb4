//! Host event lines read from stdin.
//!
//! One JSON object per line:
//!
//! ```text
//! {"player_id":7,"identity":"  ABC123  ","name":"Bob"}
//! {"player_id":7,"disconnected":true}
//! ```
//!
//! A connect line stands for a successful platform audit of that player.

use admission_gate::PlayerId;
use serde::Deserialize;

/// A single event from the host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostEvent {
    pub player_id: PlayerId,
    #[serde(default)]
    pub identity: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub disconnected: bool,
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_event(line: &str) -> Result<Option<HostEvent>, serde_json::Error> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(trimmed).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_connect_event() {
        let event = parse_event(r#"{"player_id":7,"identity":"  ABC123  ","name":"Bob"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(event.player_id, PlayerId(7));
        assert_eq!(event.identity, "  ABC123  ");
        assert_eq!(event.name.as_deref(), Some("Bob"));
        assert!(!event.disconnected);
    }

    #[test]
    fn parses_disconnect_event() {
        let event = parse_event(r#"{"player_id":7,"disconnected":true}"#)
            .unwrap()
            .unwrap();
        assert!(event.disconnected);
        assert_eq!(event.identity, "");
    }

    #[test]
    fn blank_line_is_skipped() {
        assert_eq!(parse_event("   ").unwrap(), None);
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse_event("kick everyone").is_err());
        assert!(parse_event(r#"{"identity":"abc"}"#).is_err());
    }
}
