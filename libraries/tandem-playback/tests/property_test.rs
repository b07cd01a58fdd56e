//! Property-based tests for the play-mode state machine and navigation
//!
//! Uses proptest to verify selection invariants across many playlist sizes
//! and positions.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tandem_core::PlayMode;
use tandem_playback::policy::{on_completion_with_rng, step};
use tandem_playback::{Direction, NextAction};

fn arbitrary_mode() -> impl Strategy<Value = PlayMode> {
    prop::sample::select(PlayMode::ALL.to_vec())
}

/// Playlist length and a valid index into it
fn len_and_index() -> impl Strategy<Value = (usize, usize)> {
    (1usize..200).prop_flat_map(|len| (Just(len), 0..len))
}

proptest! {
    /// Property: every selected index is inside the playlist
    #[test]
    fn completion_stays_in_bounds(
        mode in arbitrary_mode(),
        (len, index) in len_and_index(),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        if let NextAction::Play(next) = on_completion_with_rng(mode, len, Some(index), &mut rng) {
            prop_assert!(next < len);
        }
    }

    /// Property: shuffle never reselects the current index when it has a choice
    #[test]
    fn shuffle_never_repeats(
        (len, index) in (2usize..200).prop_flat_map(|len| (Just(len), 0..len)),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let action = on_completion_with_rng(PlayMode::Shuffle, len, Some(index), &mut rng);
        prop_assert!(matches!(action, NextAction::Play(next) if next != index));
    }

    /// Property: sequence advances by one and never wraps
    #[test]
    fn sequence_never_wraps((len, index) in len_and_index(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let action = on_completion_with_rng(PlayMode::Sequence, len, Some(index), &mut rng);
        if index + 1 == len {
            prop_assert_eq!(action, NextAction::Stop);
        } else {
            prop_assert_eq!(action, NextAction::Play(index + 1));
        }
    }

    /// Property: repeat-all always advances by one modulo the length
    #[test]
    fn repeat_all_cycles((len, index) in len_and_index(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let action = on_completion_with_rng(PlayMode::RepeatAll, len, Some(index), &mut rng);
        prop_assert_eq!(action, NextAction::Play((index + 1) % len));
    }

    /// Property: repeat-one always restarts, whatever the position
    #[test]
    fn repeat_one_restarts((len, index) in len_and_index(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let action = on_completion_with_rng(PlayMode::RepeatOne, len, Some(index), &mut rng);
        prop_assert_eq!(action, NextAction::Restart);
    }

    /// Property: forward then backward returns to the same slot
    #[test]
    fn navigation_round_trips((len, index) in len_and_index()) {
        let forward = step(len, Some(index), Direction::Forward).unwrap();
        let back = step(len, Some(forward), Direction::Backward).unwrap();
        prop_assert_eq!(back, index);
    }

    /// Property: `len` forward steps visit every slot once and come back
    #[test]
    fn navigation_visits_every_slot((len, index) in (1usize..50).prop_flat_map(|len| (Just(len), 0..len))) {
        let mut seen = vec![false; len];
        let mut current = index;
        for _ in 0..len {
            current = step(len, Some(current), Direction::Forward).unwrap();
            prop_assert!(!seen[current]);
            seen[current] = true;
        }
        prop_assert_eq!(current, index);
        prop_assert!(seen.iter().all(|&visited| visited));
    }
}
