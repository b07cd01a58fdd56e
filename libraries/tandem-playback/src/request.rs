//! Track-change requests
//!
//! A companion asks for a different song with an inline chat command:
//! `[切歌:Title:Artist]`. Full-width brackets and colons are accepted, as is
//! the common malformed `[切歌Title-Artist]`.

use serde::{Deserialize, Serialize};

const COMMAND: &str = "切歌";

/// Request to play a track by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackChangeRequest {
    pub title: String,
    pub artist: String,
}

impl TrackChangeRequest {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
        }
    }

    /// Extract the first track-change command from a chat message
    pub fn parse_command(text: &str) -> Option<Self> {
        text.char_indices()
            .filter(|(_, c)| is_open(*c))
            .find_map(|(i, c)| parse_body(&text[i + c.len_utf8()..]))
    }
}

fn is_open(c: char) -> bool {
    matches!(c, '[' | '【')
}

fn is_close(c: char) -> bool {
    matches!(c, ']' | '】')
}

fn is_colon(c: char) -> bool {
    matches!(c, ':' | '：')
}

/// Parse what follows an opening bracket
fn parse_body(rest: &str) -> Option<TrackChangeRequest> {
    let rest = rest.strip_prefix(COMMAND)?;
    let close = rest.find(is_close)?;
    let body = &rest[..close];

    let (title, artist) = match body.strip_prefix(is_colon) {
        Some(fields) => fields.split_once(is_colon)?,
        None => {
            if body.contains(is_colon) {
                return None;
            }
            body.split_once('-')?
        }
    };

    let title = title.trim();
    let artist = artist.trim();
    if title.is_empty() || artist.is_empty() {
        return None;
    }

    Some(TrackChangeRequest::new(title, artist))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ascii_command() {
        let request = TrackChangeRequest::parse_command("好呀 [切歌:晴天:周杰伦] 这首吧").unwrap();
        assert_eq!(request, TrackChangeRequest::new("晴天", "周杰伦"));
    }

    #[test]
    fn parses_full_width_and_trims() {
        let request = TrackChangeRequest::parse_command("【切歌： Blue Bird ：Ikimono-gakari 】").unwrap();
        assert_eq!(request, TrackChangeRequest::new("Blue Bird", "Ikimono-gakari"));
    }

    #[test]
    fn artist_may_contain_colons() {
        let request = TrackChangeRequest::parse_command("[切歌:Song:A:B]").unwrap();
        assert_eq!(request.title, "Song");
        assert_eq!(request.artist, "A:B");
    }

    #[test]
    fn parses_dash_form() {
        let request = TrackChangeRequest::parse_command("[切歌七里香-周杰伦]").unwrap();
        assert_eq!(request, TrackChangeRequest::new("七里香", "周杰伦"));
    }

    #[test]
    fn skips_other_bracketed_commands() {
        let request =
            TrackChangeRequest::parse_command("[一起听:A:B] then [切歌:C:D]").unwrap();
        assert_eq!(request, TrackChangeRequest::new("C", "D"));
    }

    #[test]
    fn rejects_incomplete_commands() {
        assert!(TrackChangeRequest::parse_command("切歌:A:B").is_none());
        assert!(TrackChangeRequest::parse_command("[切歌:A]").is_none());
        assert!(TrackChangeRequest::parse_command("[切歌: :B]").is_none());
        assert!(TrackChangeRequest::parse_command("[切歌:A:B").is_none());
        assert!(TrackChangeRequest::parse_command("just chatting").is_none());
    }
}
