use serde::{Deserialize, Serialize};

/// Width/height of an image in pixels. Used both for the decoded upload and
/// for the rendered `<img>` element on the client, which can differ after
/// responsive scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Axis-aligned bounding box in source-image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn area(&self) -> u64 {
        u64::from(self.w) * u64::from(self.h)
    }

    /// Centroid in pixel coordinates.
    pub fn centroid(&self) -> (f32, f32) {
        (
            self.x as f32 + self.w as f32 * 0.5,
            self.y as f32 + self.h as f32 * 0.5,
        )
    }
}

/// One candidate object from the upstream detector.
///
/// `depth` is normalized to [0,1] with higher meaning farther from the
/// camera; `saliency` is [0,1] with higher meaning more visually prominent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedObject {
    pub label: String,
    pub region: Region,
    pub confidence: f32,
    pub depth: f32,
    pub saliency: f32,
}

/// A chosen hiding spot for one round.
///
/// `visible_ratio` and `low_saliency_score` are independent axes; both are
/// carried so the UI can explain how hard the spot is, not just how good the
/// combined score was.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Placement {
    /// Target center as a fraction of image width/height.
    pub x_norm: f32,
    pub y_norm: f32,
    /// Hit-test tolerance in rendered-image pixels. Fixed per round, never
    /// derived from the occluder size.
    pub radius_px: f32,
    /// Fraction of the target sprite footprint left uncovered by the occluder.
    pub visible_ratio: f32,
    /// Derived difficulty metric; higher = easier-to-overlook hiding spot.
    pub low_saliency_score: f32,
    /// Label of the occluding object, or `"none"` for the degraded center
    /// fallback when no candidate was usable.
    pub occluder_label: String,
}

pub const NO_OCCLUDER: &str = "none";

/// Click record. Miss markers are rendered transiently by the UI; the session
/// keeps every marker until reset or play-again.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub x: f32,
    pub y: f32,
    pub hit: bool,
}

/// Result of one hit-tested click.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClickOutcome {
    pub hit: bool,
    pub attempts: u32,
    pub distance_px: f32,
    /// Present only on the winning click (and only when scoring is enabled).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Uploading,
    Ready,
    Playing,
    Won,
    Revealed,
}

/// Everything the UI needs to render a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub state: SessionState,
    pub attempts: u32,
    pub elapsed_ms: u64,
    /// `m:ss` for display.
    pub elapsed_display: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    pub markers: Vec<Marker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Placement>,
    /// How long the UI should keep a miss marker on screen.
    pub miss_marker_ttl_ms: u64,
}

/// Response of `POST /api/process`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub session_id: String,
    pub target: Placement,
    pub objects_detected: usize,
    pub composite_image_url: String,
    /// Per-candidate score breakdown, so the UI can explain the choice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<serde_json::Value>,
    pub session: SessionView,
}

/// Uniform error payload for non-2xx API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
