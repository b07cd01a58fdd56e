/// Play mode domain type
use crate::error::TandemError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Policy for choosing the next track when the current one finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayMode {
    /// Play through once, stop after the last track
    Sequence,

    /// Pick a random different track
    Shuffle,

    /// Loop the current track
    RepeatOne,

    /// Loop the whole playlist
    #[default]
    RepeatAll,
}

impl PlayMode {
    /// All modes in toggle order
    pub const ALL: [PlayMode; 4] = [
        PlayMode::RepeatAll,
        PlayMode::RepeatOne,
        PlayMode::Shuffle,
        PlayMode::Sequence,
    ];

    /// Next mode in the toggle cycle
    ///
    /// `repeat-all -> repeat-one -> shuffle -> sequence -> repeat-all`
    pub fn next(self) -> Self {
        match self {
            PlayMode::RepeatAll => PlayMode::RepeatOne,
            PlayMode::RepeatOne => PlayMode::Shuffle,
            PlayMode::Shuffle => PlayMode::Sequence,
            PlayMode::Sequence => PlayMode::RepeatAll,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlayMode::Sequence => "sequence",
            PlayMode::Shuffle => "shuffle",
            PlayMode::RepeatOne => "repeat-one",
            PlayMode::RepeatAll => "repeat-all",
        }
    }
}

impl fmt::Display for PlayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlayMode {
    type Err = TandemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequence" => Ok(PlayMode::Sequence),
            "shuffle" => Ok(PlayMode::Shuffle),
            "repeat-one" | "repeat_one" => Ok(PlayMode::RepeatOne),
            "repeat-all" | "repeat_all" => Ok(PlayMode::RepeatAll),
            other => Err(TandemError::invalid_input(format!(
                "unknown play mode: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_repeat_all() {
        assert_eq!(PlayMode::default(), PlayMode::RepeatAll);
    }

    #[test]
    fn four_toggles_return_to_start() {
        for start in PlayMode::ALL {
            let mut mode = start;
            for _ in 0..4 {
                mode = mode.next();
            }
            assert_eq!(mode, start);
        }
    }

    #[test]
    fn toggle_order() {
        assert_eq!(PlayMode::RepeatAll.next(), PlayMode::RepeatOne);
        assert_eq!(PlayMode::RepeatOne.next(), PlayMode::Shuffle);
        assert_eq!(PlayMode::Shuffle.next(), PlayMode::Sequence);
        assert_eq!(PlayMode::Sequence.next(), PlayMode::RepeatAll);
    }

    #[test]
    fn string_round_trip_matches_serde() {
        for mode in PlayMode::ALL {
            let parsed: PlayMode = mode.as_str().parse().unwrap();
            assert_eq!(parsed, mode);

            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.as_str()));
        }
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!("loop".parse::<PlayMode>().is_err());
    }
}
