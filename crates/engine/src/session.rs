//! Click-search game session state machine.
//!
//! One [`GameSession`] is one play-through: `Idle → Uploading → Ready →
//! Playing → {Won | Revealed}`, with play-again looping back to `Playing` on
//! the *same* placement and reset returning to `Idle` from anywhere. The
//! session never touches a wall clock on its own; every time-dependent event
//! takes the caller's `Instant`.

use peekaboo_protocol::{ClickOutcome, ImageSize, Marker, Placement, SessionState, SessionView};
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Non-image selection. Recovered locally; the state does not change.
    #[error("only image uploads are accepted (got {0:?})")]
    InvalidFileType(String),
    /// A processing response arrived for a superseded upload. Callers discard
    /// this silently; it must never be applied.
    #[error("processing response belongs to a superseded upload")]
    StaleResponse,
    /// Event not legal in the current state (e.g. a click while uploading).
    #[error("event not allowed while {0:?}")]
    NotAllowed(SessionState),
}

/// Token tying an in-flight processing call to the upload that started it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadToken(u64);

#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Skip the `Ready` state and enter `Playing` as soon as processing
    /// succeeds.
    pub auto_start: bool,
    /// Compute a score at the `Won` transition.
    pub scoring: bool,
    /// Whether giving up records a zero score instead of no score. Source
    /// variants disagree, so this is an explicit flag rather than a guess.
    pub give_up_scores_zero: bool,
    /// How long the UI should keep a miss marker visible. The session only
    /// records markers; scheduling their removal is a rendering concern.
    pub miss_marker_ttl_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auto_start: true,
            scoring: true,
            give_up_scores_zero: false,
            miss_marker_ttl_ms: 1000,
        }
    }
}

/// `max(0, 1000 - 50*attempts - 10*elapsed_seconds)`. Monotonically
/// non-increasing in both inputs, clamped at zero.
pub fn score(attempts: u32, elapsed: Duration) -> u32 {
    let raw = 1000_i64 - 50 * i64::from(attempts) - 10 * elapsed.as_secs() as i64;
    raw.max(0) as u32
}

#[derive(Debug, Clone)]
pub struct GameSession {
    cfg: SessionConfig,
    state: SessionState,
    /// Bumped on every upload and reset; stale processing responses carry an
    /// older generation and are rejected.
    generation: u64,
    target: Option<Placement>,
    attempts: u32,
    markers: Vec<Marker>,
    started_at: Option<Instant>,
    /// Set exactly once at the terminal transition; the timer never
    /// accumulates past `Won`/`Revealed`.
    frozen_elapsed: Option<Duration>,
    score: Option<u32>,
    last_failure: Option<String>,
}

impl GameSession {
    pub fn new(cfg: SessionConfig) -> Self {
        Self {
            cfg,
            state: SessionState::Idle,
            generation: 0,
            target: None,
            attempts: 0,
            markers: Vec::new(),
            started_at: None,
            frozen_elapsed: None,
            score: None,
            last_failure: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn target(&self) -> Option<&Placement> {
        self.target.as_ref()
    }

    pub fn score_value(&self) -> Option<u32> {
        self.score
    }

    /// Reason of the most recent upstream failure, for user display.
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    /// A file was selected. Rejects non-image MIME types without changing
    /// state; otherwise discards any previous round and enters `Uploading`.
    /// The returned token must be echoed by `processing_complete`; uploading
    /// again first makes the old token stale.
    pub fn image_selected(&mut self, mime: &str) -> Result<UploadToken, SessionError> {
        if !mime.starts_with("image/") {
            return Err(SessionError::InvalidFileType(mime.to_string()));
        }
        self.clear_round();
        self.target = None;
        self.last_failure = None;
        self.generation += 1;
        self.state = SessionState::Uploading;
        Ok(UploadToken(self.generation))
    }

    /// The processing pipeline finished for the upload identified by `token`.
    ///
    /// A response for a superseded upload (new upload or reset happened in
    /// the meantime) is rejected as `StaleResponse` and must not be applied.
    pub fn processing_complete(
        &mut self,
        token: UploadToken,
        outcome: Result<Placement, String>,
        now: Instant,
    ) -> Result<(), SessionError> {
        if token.0 != self.generation || self.state != SessionState::Uploading {
            return Err(SessionError::StaleResponse);
        }
        match outcome {
            Ok(placement) => {
                self.target = Some(placement);
                self.clear_round();
                if self.cfg.auto_start {
                    self.state = SessionState::Playing;
                    self.started_at = Some(now);
                } else {
                    self.state = SessionState::Ready;
                }
            }
            Err(reason) => {
                self.last_failure = Some(reason);
                self.target = None;
                self.clear_round();
                self.state = SessionState::Idle;
            }
        }
        Ok(())
    }

    /// `Ready → Playing` for the non-auto-start variant.
    pub fn begin_round(&mut self, now: Instant) -> Result<(), SessionError> {
        if self.state != SessionState::Ready {
            return Err(SessionError::NotAllowed(self.state));
        }
        self.clear_round();
        self.state = SessionState::Playing;
        self.started_at = Some(now);
        Ok(())
    }

    /// Hit-test one click while `Playing`.
    ///
    /// `point` is in rendered-element pixels and `rendered` is the current
    /// on-screen size of the image element, which can differ from the source
    /// resolution after responsive scaling. The target is projected into the
    /// same space; a click exactly on the radius boundary counts as a hit.
    pub fn handle_click(
        &mut self,
        point: (f32, f32),
        rendered: ImageSize,
        now: Instant,
    ) -> Result<ClickOutcome, SessionError> {
        if self.state != SessionState::Playing {
            return Err(SessionError::NotAllowed(self.state));
        }
        let target = self
            .target
            .as_ref()
            .ok_or(SessionError::NotAllowed(self.state))?;

        let tx = target.x_norm * rendered.width as f32;
        let ty = target.y_norm * rendered.height as f32;
        let distance = ((point.0 - tx).powi(2) + (point.1 - ty).powi(2)).sqrt();
        let hit = distance <= target.radius_px;

        self.attempts += 1;
        self.markers.push(Marker {
            x: point.0,
            y: point.1,
            hit,
        });

        if hit {
            self.stop_timer(now);
            self.state = SessionState::Won;
            if self.cfg.scoring {
                self.score = Some(score(self.attempts, self.frozen_elapsed.unwrap_or_default()));
            }
        }

        Ok(ClickOutcome {
            hit,
            attempts: self.attempts,
            distance_px: distance,
            score: self.score,
        })
    }

    /// Explicit surrender: `Playing → Revealed`, timer stopped, true
    /// placement exposed via [`GameSession::view`].
    pub fn give_up(&mut self, now: Instant) -> Result<(), SessionError> {
        if self.state != SessionState::Playing {
            return Err(SessionError::NotAllowed(self.state));
        }
        self.stop_timer(now);
        self.state = SessionState::Revealed;
        if self.cfg.scoring && self.cfg.give_up_scores_zero {
            self.score = Some(0);
        }
        Ok(())
    }

    /// Another round on the *same* placement: markers and attempts cleared,
    /// timer restarted. Re-hiding at a new spot is deliberately not done.
    pub fn play_again(&mut self, now: Instant) -> Result<(), SessionError> {
        if !matches!(self.state, SessionState::Won | SessionState::Revealed) {
            return Err(SessionError::NotAllowed(self.state));
        }
        self.clear_round();
        self.state = SessionState::Playing;
        self.started_at = Some(now);
        Ok(())
    }

    /// Full reset from any state. Idempotent from `Idle`; always invalidates
    /// any in-flight processing call and discards the placement.
    pub fn reset(&mut self) {
        self.clear_round();
        self.target = None;
        self.last_failure = None;
        self.generation += 1;
        self.state = SessionState::Idle;
    }

    /// Elapsed round time: live while `Playing`, frozen at the terminal
    /// transition, zero otherwise.
    pub fn elapsed(&self, now: Instant) -> Duration {
        if let Some(frozen) = self.frozen_elapsed {
            return frozen;
        }
        match (self.state, self.started_at) {
            (SessionState::Playing, Some(t0)) => now.saturating_duration_since(t0),
            _ => Duration::ZERO,
        }
    }

    /// Snapshot for the UI. The placement is exposed only once the round is
    /// over (the reveal); handing it out mid-round would spoil the game.
    pub fn view(&self, now: Instant) -> SessionView {
        let elapsed = self.elapsed(now);
        let reveal = matches!(self.state, SessionState::Won | SessionState::Revealed);
        SessionView {
            state: self.state,
            attempts: self.attempts,
            elapsed_ms: elapsed.as_millis() as u64,
            elapsed_display: format_elapsed(elapsed),
            score: self.score,
            markers: self.markers.clone(),
            target: if reveal { self.target.clone() } else { None },
            miss_marker_ttl_ms: self.cfg.miss_marker_ttl_ms,
        }
    }

    fn clear_round(&mut self) {
        self.attempts = 0;
        self.markers.clear();
        self.started_at = None;
        self.frozen_elapsed = None;
        self.score = None;
    }

    fn stop_timer(&mut self, now: Instant) {
        if self.frozen_elapsed.is_none() {
            self.frozen_elapsed = Some(match self.started_at {
                Some(t0) => now.saturating_duration_since(t0),
                None => Duration::ZERO,
            });
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

/// `m:ss`, seconds zero-padded.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!("{}:{:02}", total / 60, total % 60)
}
