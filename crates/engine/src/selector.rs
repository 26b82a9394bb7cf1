//! Occlusion-based placement selection.
//!
//! Given the detected objects of a photograph, pick the one that makes the
//! best hiding spot for a fixed-size target sprite and derive a normalized
//! placement from its centroid. Pure function of its inputs plus the fixed
//! constants in [`SelectorConfig`]; identical inputs always yield the
//! identical [`Placement`].

use peekaboo_protocol::{DetectedObject, ImageSize, Placement, Region, NO_OCCLUDER};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectError {
    /// The upstream detector found zero usable objects. The caller-wide
    /// fallback policy decides what happens next; see [`resolve_placement`].
    #[error("no candidate objects to hide behind")]
    NoCandidates,
    #[error("image size must be positive in both dimensions")]
    EmptyImage,
}

/// What to do when the detector yields nothing. Decided once per deployment,
/// not per call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackPolicy {
    /// Degraded mode: hide at the image center with `occluder_label = "none"`.
    CenterFallback,
    /// Propagate `NoCandidates`; the round is aborted.
    Abort,
}

#[derive(Debug, Clone, Copy)]
pub struct SelectorConfig {
    /// Footprint of the rendered target sprite, in source-image pixels.
    pub sprite_w: f32,
    pub sprite_h: f32,
    /// Hit-test tolerance. A fixed constant: how forgiving a click is has
    /// nothing to do with how well-hidden the target is.
    pub hit_radius_px: f32,
    /// Raw saliency that scores best. Medium-low contrast beats the absolute
    /// smoothest patch, which tends to be empty sky or wall.
    pub saliency_sweet_spot: f32,
    /// Visible ratio that scores best. A sliver of the sprite should peek
    /// out; fully swallowed or fully exposed both make a poor round.
    pub visibility_sweet_spot: f32,
    pub fallback: FallbackPolicy,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            sprite_w: 72.0,
            sprite_h: 92.0,
            hit_radius_px: 42.0,
            saliency_sweet_spot: 0.4,
            visibility_sweet_spot: 0.25,
            fallback: FallbackPolicy::CenterFallback,
        }
    }
}

/// Per-candidate score breakdown, exposed so the API can report why a spot
/// was chosen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateScore {
    pub label: String,
    pub visible_ratio: f32,
    pub visibility_score: f32,
    pub low_saliency_score: f32,
    pub combined: f32,
    pub center_distance_px: f32,
    pub depth: f32,
    pub confidence: f32,
}

/// Triangular kernel peaking at `target`, reaching zero at `0` and
/// `2 * target`, clamped to [0,1].
fn sweet_spot(value: f32, target: f32) -> f32 {
    if target <= 0.0 {
        return 0.0;
    }
    1.0 - ((value - target).abs() / target).min(1.0)
}

/// Fraction of the sprite footprint, centered on `(cx, cy)` and clamped into
/// the image, left uncovered by `region`'s bounding box.
fn visible_ratio(cx: f32, cy: f32, cfg: &SelectorConfig, region: Region, size: ImageSize) -> f32 {
    let (img_w, img_h) = (size.width as f32, size.height as f32);
    let sx1 = (cx - cfg.sprite_w * 0.5).clamp(0.0, img_w);
    let sy1 = (cy - cfg.sprite_h * 0.5).clamp(0.0, img_h);
    let sx2 = (cx + cfg.sprite_w * 0.5).clamp(0.0, img_w);
    let sy2 = (cy + cfg.sprite_h * 0.5).clamp(0.0, img_h);
    let sprite_area = (sx2 - sx1) * (sy2 - sy1);
    if sprite_area <= 0.0 {
        return 1.0;
    }

    let (bx1, by1) = (region.x as f32, region.y as f32);
    let (bx2, by2) = (bx1 + region.w as f32, by1 + region.h as f32);
    let ow = (sx2.min(bx2) - sx1.max(bx1)).max(0.0);
    let oh = (sy2.min(by2) - sy1.max(by1)).max(0.0);
    let covered = (ow * oh / sprite_area).clamp(0.0, 1.0);
    1.0 - covered
}

/// Score every candidate. Output order matches input order.
pub fn score_candidates(
    objects: &[DetectedObject],
    size: ImageSize,
    cfg: &SelectorConfig,
) -> Vec<CandidateScore> {
    let center_x = size.width as f32 * 0.5;
    let center_y = size.height as f32 * 0.5;
    objects
        .iter()
        .map(|obj| {
            let (cx, cy) = obj.region.centroid();
            let vr = visible_ratio(cx, cy, cfg, obj.region, size);
            let visibility_score = sweet_spot(vr, cfg.visibility_sweet_spot);
            let low_saliency_score = sweet_spot(obj.saliency, cfg.saliency_sweet_spot);
            CandidateScore {
                label: obj.label.clone(),
                visible_ratio: vr,
                visibility_score,
                low_saliency_score,
                combined: 0.5 * visibility_score + 0.5 * low_saliency_score,
                center_distance_px: ((cx - center_x).powi(2) + (cy - center_y).powi(2)).sqrt(),
                depth: obj.depth,
                confidence: obj.confidence,
            }
        })
        .collect()
}

/// Pick the best hiding spot among `objects`.
///
/// Suitability is the equal-weight mean of the visibility and low-saliency
/// kernels; ties prefer the candidate whose centroid sits closer to the image
/// center (keeps the target reachable, avoids edge placement), then the
/// earlier candidate.
pub fn select_placement(
    objects: &[DetectedObject],
    size: ImageSize,
    cfg: &SelectorConfig,
) -> Result<Placement, SelectError> {
    if size.is_empty() {
        return Err(SelectError::EmptyImage);
    }
    if objects.is_empty() {
        return Err(SelectError::NoCandidates);
    }

    let scores = score_candidates(objects, size, cfg);
    let mut best = 0usize;
    for i in 1..scores.len() {
        let (a, b) = (&scores[i], &scores[best]);
        if a.combined > b.combined
            || (a.combined == b.combined && a.center_distance_px < b.center_distance_px)
        {
            best = i;
        }
    }

    let winner = &objects[best];
    let (cx, cy) = winner.region.centroid();
    Ok(Placement {
        x_norm: (cx / size.width as f32).clamp(0.0, 1.0),
        y_norm: (cy / size.height as f32).clamp(0.0, 1.0),
        radius_px: cfg.hit_radius_px,
        visible_ratio: scores[best].visible_ratio,
        low_saliency_score: scores[best].low_saliency_score,
        occluder_label: winner.label.clone(),
    })
}

/// Centered degraded placement used when no occluder is available.
fn center_fallback(cfg: &SelectorConfig) -> Placement {
    Placement {
        x_norm: 0.5,
        y_norm: 0.5,
        radius_px: cfg.hit_radius_px,
        visible_ratio: 1.0,
        low_saliency_score: 0.0,
        occluder_label: NO_OCCLUDER.to_string(),
    }
}

/// [`select_placement`] with the crate-wide `NoCandidates` policy applied.
/// This is the only place the policy is consulted.
pub fn resolve_placement(
    objects: &[DetectedObject],
    size: ImageSize,
    cfg: &SelectorConfig,
) -> Result<Placement, SelectError> {
    match select_placement(objects, size, cfg) {
        Err(SelectError::NoCandidates) if cfg.fallback == FallbackPolicy::CenterFallback => {
            Ok(center_fallback(cfg))
        }
        other => other,
    }
}
