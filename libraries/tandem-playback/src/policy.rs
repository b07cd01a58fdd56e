//! Play-mode state machine
//!
//! Pure selection logic: given the mode, playlist length and current index,
//! decide what happens when the current track completes, or where user
//! navigation lands.

use rand::Rng;
use tandem_core::PlayMode;

/// What to do after the current track completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextAction {
    /// Reload the current track from position zero and resume
    Restart,

    /// Load and play the track at this index
    Play(usize),

    /// Stop; keep the current track and index
    Stop,

    /// Nothing to do (empty playlist)
    Nothing,
}

/// Decide the next action on natural completion
///
/// `current` is `None` when the current track is not in the playlist; the
/// advancing modes then start from index 0.
pub fn on_completion(mode: PlayMode, len: usize, current: Option<usize>) -> NextAction {
    on_completion_with_rng(mode, len, current, &mut rand::thread_rng())
}

/// [`on_completion`] with an explicit random source
pub fn on_completion_with_rng<R: Rng + ?Sized>(
    mode: PlayMode,
    len: usize,
    current: Option<usize>,
    rng: &mut R,
) -> NextAction {
    if len == 0 {
        return NextAction::Nothing;
    }

    match mode {
        PlayMode::RepeatOne => NextAction::Restart,
        PlayMode::Shuffle => {
            let mut pick = rng.gen_range(0..len);
            if len > 1 && Some(pick) == current {
                pick = (pick + 1) % len;
            }
            NextAction::Play(pick)
        }
        PlayMode::Sequence => match current {
            None => NextAction::Play(0),
            Some(i) if i + 1 < len => NextAction::Play(i + 1),
            Some(_) => NextAction::Stop,
        },
        PlayMode::RepeatAll => NextAction::Play(current.map_or(0, |i| (i + 1) % len)),
    }
}

/// Navigation direction for next/previous
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// One slot in `direction`, wrapping both ways; independent of play mode
///
/// With nothing current, lands on index 0. `None` only for an empty playlist.
pub fn step(len: usize, current: Option<usize>, direction: Direction) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let Some(i) = current else {
        return Some(0);
    };
    let i = i % len;
    Some(match direction {
        Direction::Forward => (i + 1) % len,
        Direction::Backward => (i + len - 1) % len,
    })
}
