//! Core logic for the Peekaboo photo game: the occlusion-based placement
//! selector and the click-search session state machine.
//!
//! Everything in here is pure and synchronous. The server (or any other
//! host) owns I/O, clocks are injected as `std::time::Instant`, and the only
//! shared values across rounds are the fixed constants in the config structs.

pub mod selector;
pub mod session;

pub use selector::{
    resolve_placement, score_candidates, select_placement, CandidateScore, FallbackPolicy,
    SelectError, SelectorConfig,
};
pub use session::{format_elapsed, score, GameSession, SessionConfig, SessionError, UploadToken};

#[cfg(test)]
mod tests;
