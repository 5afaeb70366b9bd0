//! The game: round selection over a series and the guess/reveal state machine.

pub mod clock;
pub mod selector;
pub mod state;

pub use clock::{Clock, FixedClock, SystemClock};
pub use selector::{
    candidate_indices, eligible_indices, select_start_index, IndexChooser, RoundRules,
    SelectError,
};
pub use state::{
    EndReason, FinalSummary, GameError, GameState, Guess, Phase, RevealOutcome, RoundResult,
};
