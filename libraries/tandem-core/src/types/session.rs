/// Listen-together session types
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Who caused a track change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Initiator {
    /// Explicit next/previous from the local user
    User,

    /// Play-mode policy or an invite-driven request
    #[default]
    System,
}

impl Initiator {
    pub fn as_str(self) -> &'static str {
        match self {
            Initiator::User => "user",
            Initiator::System => "system",
        }
    }

    /// Parse the persisted form, `None` for anything unknown
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Initiator::User),
            "system" => Some(Initiator::System),
            _ => None,
        }
    }
}

impl fmt::Display for Initiator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared "listening together" record
///
/// Created by the invite flow when a companion accepts; the playback engine
/// only overwrites the track fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Companion the session is shared with
    pub partner_id: String,

    /// Title of the jointly observed track
    pub track_title: String,

    /// Artist of the jointly observed track
    pub track_artist: String,

    /// When the session started (Unix epoch, milliseconds)
    pub started_at_epoch_ms: i64,

    /// When the track last changed (Unix epoch, milliseconds)
    pub changed_at_epoch_ms: Option<i64>,

    /// Who changed the track last
    pub changed_by: Option<Initiator>,
}

impl SessionRecord {
    /// Create a freshly started session
    pub fn new(
        partner_id: impl Into<String>,
        track_title: impl Into<String>,
        track_artist: impl Into<String>,
        started_at_epoch_ms: i64,
    ) -> Self {
        Self {
            partner_id: partner_id.into(),
            track_title: track_title.into(),
            track_artist: track_artist.into(),
            started_at_epoch_ms,
            changed_at_epoch_ms: None,
            changed_by: None,
        }
    }

    /// Apply a track change in place
    pub fn apply(&mut self, change: &TrackChange) {
        self.track_title.clone_from(&change.title);
        self.track_artist.clone_from(&change.artist);
        self.changed_at_epoch_ms = Some(change.changed_at_epoch_ms);
        self.changed_by = Some(change.changed_by);
    }

    /// How long the session has been running at `now_epoch_ms`
    pub fn elapsed(&self, now_epoch_ms: i64) -> ListeningDuration {
        let millis = now_epoch_ms.saturating_sub(self.started_at_epoch_ms).max(0);
        ListeningDuration(Duration::from_millis(millis as u64))
    }
}

/// A track change to write into the session record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackChange {
    pub title: String,
    pub artist: String,
    pub changed_at_epoch_ms: i64,
    pub changed_by: Initiator,
}

/// Human-readable "listened together for" duration
///
/// Formats as `1h 5m`, `3m 12s` or `42s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ListeningDuration(pub Duration);

impl fmt::Display for ListeningDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.0.as_secs();
        let hours = total / 3600;
        let minutes = (total % 3600) / 60;
        let seconds = total % 60;

        if hours > 0 {
            write!(f, "{hours}h {minutes}m")
        } else if minutes > 0 {
            write!(f, "{minutes}m {seconds}s")
        } else {
            write!(f, "{seconds}s")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_overwrites_track_fields_only() {
        let mut record = SessionRecord::new("partner-1", "Old", "Old Artist", 1_000);
        record.apply(&TrackChange {
            title: "New".into(),
            artist: "New Artist".into(),
            changed_at_epoch_ms: 5_000,
            changed_by: Initiator::User,
        });

        assert_eq!(record.partner_id, "partner-1");
        assert_eq!(record.started_at_epoch_ms, 1_000);
        assert_eq!(record.track_title, "New");
        assert_eq!(record.track_artist, "New Artist");
        assert_eq!(record.changed_at_epoch_ms, Some(5_000));
        assert_eq!(record.changed_by, Some(Initiator::User));
    }

    #[test]
    fn listening_duration_formats() {
        assert_eq!(ListeningDuration(Duration::from_secs(42)).to_string(), "42s");
        assert_eq!(ListeningDuration(Duration::from_secs(192)).to_string(), "3m 12s");
        assert_eq!(ListeningDuration(Duration::from_secs(3900)).to_string(), "1h 5m");
    }

    #[test]
    fn elapsed_never_negative() {
        let record = SessionRecord::new("p", "t", "a", 10_000);
        assert_eq!(record.elapsed(5_000).0, Duration::ZERO);
        assert_eq!(record.elapsed(70_000).0, Duration::from_secs(60));
    }

    #[test]
    fn initiator_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Initiator::User).unwrap(), "\"user\"");
        assert_eq!(Initiator::from_str("system"), Some(Initiator::System));
        assert_eq!(Initiator::from_str("robot"), None);
    }
}
