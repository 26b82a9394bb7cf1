use super::*;
use peekaboo_protocol::{DetectedObject, ImageSize, Placement, Region, SessionState, NO_OCCLUDER};
use std::time::{Duration, Instant};

fn obj(label: &str, x: u32, y: u32, w: u32, h: u32, saliency: f32) -> DetectedObject {
    DetectedObject {
        label: label.to_string(),
        region: Region::new(x, y, w, h),
        confidence: 0.9,
        depth: 0.5,
        saliency,
    }
}

fn size_800x600() -> ImageSize {
    ImageSize::new(800, 600)
}

fn placement(x_norm: f32, y_norm: f32, radius_px: f32) -> Placement {
    Placement {
        x_norm,
        y_norm,
        radius_px,
        visible_ratio: 0.3,
        low_saliency_score: 0.8,
        occluder_label: "couch".to_string(),
    }
}

fn playing_session(target: Placement, t0: Instant) -> GameSession {
    let mut s = GameSession::default();
    let token = s.image_selected("image/png").unwrap();
    s.processing_complete(token, Ok(target), t0).unwrap();
    assert_eq!(s.state(), SessionState::Playing);
    s
}

// -- selector --

#[test]
fn placement_fields_stay_in_range() {
    let cfg = SelectorConfig::default();
    let objects = vec![
        obj("lamp", 0, 0, 20, 20, 0.95),
        obj("couch", 200, 150, 300, 200, 0.35),
        obj("plant", 700, 500, 90, 90, 0.1),
    ];
    let p = select_placement(&objects, size_800x600(), &cfg).unwrap();
    assert!((0.0..=1.0).contains(&p.x_norm));
    assert!((0.0..=1.0).contains(&p.y_norm));
    assert!((0.0..=1.0).contains(&p.visible_ratio));
    assert!((0.0..=1.0).contains(&p.low_saliency_score));
    assert!(p.radius_px > 0.0);
}

#[test]
fn selection_is_deterministic() {
    let cfg = SelectorConfig::default();
    let objects = vec![
        obj("chair", 100, 100, 120, 150, 0.5),
        obj("couch", 300, 200, 250, 180, 0.4),
        obj("rug", 50, 400, 400, 120, 0.6),
    ];
    let a = select_placement(&objects, size_800x600(), &cfg).unwrap();
    let b = select_placement(&objects, size_800x600(), &cfg).unwrap();
    assert_eq!(a.x_norm, b.x_norm);
    assert_eq!(a.y_norm, b.y_norm);
    assert_eq!(a.occluder_label, b.occluder_label);
    assert_eq!(a.visible_ratio, b.visible_ratio);
}

#[test]
fn dull_medium_object_beats_busy_one() {
    let cfg = SelectorConfig::default();
    // Same geometry, different saliency: the visually dull one must win.
    let objects = vec![
        obj("tv", 200, 150, 150, 150, 0.95),
        obj("cushion", 450, 150, 150, 150, 0.4),
    ];
    let p = select_placement(&objects, size_800x600(), &cfg).unwrap();
    assert_eq!(p.occluder_label, "cushion");
}

#[test]
fn ties_prefer_centroid_closer_to_center() {
    let cfg = SelectorConfig::default();
    // Identical boxes and saliency, mirrored around the center; the one whose
    // centroid is nearer (400, 300) wins.
    let objects = vec![
        obj("far", 0, 0, 100, 100, 0.4),
        obj("near", 360, 260, 100, 100, 0.4),
    ];
    let p = select_placement(&objects, size_800x600(), &cfg).unwrap();
    assert_eq!(p.occluder_label, "near");
}

#[test]
fn empty_objects_is_no_candidates() {
    let cfg = SelectorConfig::default();
    assert_eq!(
        select_placement(&[], size_800x600(), &cfg).unwrap_err(),
        SelectError::NoCandidates
    );
}

#[test]
fn zero_sized_image_is_rejected() {
    let cfg = SelectorConfig::default();
    let objects = vec![obj("couch", 0, 0, 10, 10, 0.4)];
    assert_eq!(
        select_placement(&objects, ImageSize::new(0, 600), &cfg).unwrap_err(),
        SelectError::EmptyImage
    );
}

#[test]
fn fallback_policy_places_at_center() {
    let cfg = SelectorConfig::default();
    let p = resolve_placement(&[], size_800x600(), &cfg).unwrap();
    assert_eq!(p.x_norm, 0.5);
    assert_eq!(p.y_norm, 0.5);
    assert_eq!(p.occluder_label, NO_OCCLUDER);
    assert_eq!(p.visible_ratio, 1.0);
    assert_eq!(p.low_saliency_score, 0.0);
}

#[test]
fn abort_policy_propagates_no_candidates() {
    let cfg = SelectorConfig {
        fallback: FallbackPolicy::Abort,
        ..SelectorConfig::default()
    };
    assert_eq!(
        resolve_placement(&[], size_800x600(), &cfg).unwrap_err(),
        SelectError::NoCandidates
    );
}

#[test]
fn candidate_scores_keep_input_order_and_both_axes() {
    let cfg = SelectorConfig::default();
    let objects = vec![
        obj("a", 10, 10, 50, 50, 0.2),
        obj("b", 300, 300, 200, 150, 0.7),
    ];
    let scores = score_candidates(&objects, size_800x600(), &cfg);
    assert_eq!(scores.len(), 2);
    assert_eq!(scores[0].label, "a");
    assert_eq!(scores[1].label, "b");
    for s in &scores {
        assert!((0.0..=1.0).contains(&s.visible_ratio));
        assert!((0.0..=1.0).contains(&s.low_saliency_score));
    }
}

// -- scoring --

#[test]
fn score_scenario_from_round() {
    assert_eq!(score(3, Duration::from_secs(20)), 650);
}

#[test]
fn score_is_monotonic_and_clamped() {
    for attempts in 0..40 {
        for secs in 0..120 {
            let s = score(attempts, Duration::from_secs(secs));
            assert!(s <= score(attempts, Duration::from_secs(secs.saturating_sub(1))));
            assert!(s <= score(attempts.saturating_sub(1), Duration::from_secs(secs)));
        }
    }
    assert_eq!(score(100, Duration::from_secs(600)), 0);
}

#[test]
fn elapsed_formats_as_minutes_seconds() {
    assert_eq!(format_elapsed(Duration::from_secs(0)), "0:00");
    assert_eq!(format_elapsed(Duration::from_secs(7)), "0:07");
    assert_eq!(format_elapsed(Duration::from_secs(65)), "1:05");
    assert_eq!(format_elapsed(Duration::from_secs(600)), "10:00");
}

// -- session state machine --

#[test]
fn click_at_center_hits_and_off_center_misses() {
    let t0 = Instant::now();
    let rendered = size_800x600();

    let mut s = playing_session(placement(0.5, 0.5, 50.0), t0);
    let hit = s.handle_click((400.0, 300.0), rendered, t0).unwrap();
    assert!(hit.hit);
    assert_eq!(hit.distance_px, 0.0);
    assert_eq!(s.state(), SessionState::Won);

    let mut s = playing_session(placement(0.5, 0.5, 50.0), t0);
    let miss = s.handle_click((300.0, 300.0), rendered, t0).unwrap();
    assert!(!miss.hit);
    assert_eq!(miss.distance_px, 100.0);
    assert_eq!(s.state(), SessionState::Playing);
}

#[test]
fn click_on_radius_boundary_is_inclusive() {
    let t0 = Instant::now();
    let rendered = size_800x600();

    let mut s = playing_session(placement(0.5, 0.5, 50.0), t0);
    // Exactly radius away.
    assert!(s.handle_click((450.0, 300.0), rendered, t0).unwrap().hit);

    let mut s = playing_session(placement(0.5, 0.5, 50.0), t0);
    // Just past the boundary.
    assert!(!s.handle_click((450.1, 300.0), rendered, t0).unwrap().hit);
}

#[test]
fn hit_test_uses_rendered_size_not_source_size() {
    let t0 = Instant::now();
    let mut s = playing_session(placement(0.25, 0.25, 10.0), t0);
    // Rendered at half the source size: the target projects to (100, 75).
    let rendered = ImageSize::new(400, 300);
    assert!(s.handle_click((100.0, 75.0), rendered, t0).unwrap().hit);
}

#[test]
fn misses_accumulate_attempts_and_markers() {
    let t0 = Instant::now();
    let rendered = size_800x600();
    let mut s = playing_session(placement(0.5, 0.5, 50.0), t0);

    s.handle_click((10.0, 10.0), rendered, t0).unwrap();
    s.handle_click((20.0, 20.0), rendered, t0).unwrap();
    let win = s.handle_click((400.0, 300.0), rendered, t0).unwrap();

    assert_eq!(win.attempts, 3);
    assert_eq!(s.markers().len(), 3);
    assert!(!s.markers()[0].hit);
    assert!(s.markers()[2].hit);
}

#[test]
fn winning_click_scores_with_elapsed_time() {
    let t0 = Instant::now();
    let rendered = size_800x600();
    let mut s = playing_session(placement(0.5, 0.5, 50.0), t0);

    let later = t0 + Duration::from_secs(20);
    s.handle_click((10.0, 10.0), rendered, later).unwrap();
    s.handle_click((20.0, 20.0), rendered, later).unwrap();
    let win = s.handle_click((400.0, 300.0), rendered, later).unwrap();

    // 3 attempts, 20 seconds.
    assert_eq!(win.score, Some(650));
    assert_eq!(s.score_value(), Some(650));
}

#[test]
fn timer_freezes_at_terminal_transition() {
    let t0 = Instant::now();
    let rendered = size_800x600();
    let mut s = playing_session(placement(0.5, 0.5, 50.0), t0);

    let win_at = t0 + Duration::from_secs(5);
    s.handle_click((400.0, 300.0), rendered, win_at).unwrap();

    // Leaving the UI open must not keep accumulating time.
    let much_later = t0 + Duration::from_secs(500);
    assert_eq!(s.elapsed(much_later), Duration::from_secs(5));
    assert_eq!(s.view(much_later).elapsed_display, "0:05");
}

#[test]
fn give_up_then_play_again_keeps_placement_and_resets_counters() {
    let t0 = Instant::now();
    let rendered = size_800x600();
    let mut s = playing_session(placement(0.5, 0.5, 50.0), t0);

    s.handle_click((10.0, 10.0), rendered, t0).unwrap();
    s.give_up(t0 + Duration::from_secs(3)).unwrap();
    assert_eq!(s.state(), SessionState::Revealed);

    let before = s.target().unwrap().clone();
    s.play_again(t0 + Duration::from_secs(4)).unwrap();
    assert_eq!(s.state(), SessionState::Playing);
    assert_eq!(s.attempts(), 0);
    assert!(s.markers().is_empty());
    assert_eq!(s.score_value(), None);

    let after = s.target().unwrap();
    assert_eq!(after.x_norm, before.x_norm);
    assert_eq!(after.y_norm, before.y_norm);
    assert_eq!(after.occluder_label, before.occluder_label);
}

#[test]
fn give_up_score_is_a_config_flag() {
    let t0 = Instant::now();
    let mut s = playing_session(placement(0.5, 0.5, 50.0), t0);
    s.give_up(t0).unwrap();
    assert_eq!(s.score_value(), None);

    let mut s = GameSession::new(SessionConfig {
        give_up_scores_zero: true,
        ..SessionConfig::default()
    });
    let token = s.image_selected("image/jpeg").unwrap();
    s.processing_complete(token, Ok(placement(0.5, 0.5, 50.0)), t0)
        .unwrap();
    s.give_up(t0).unwrap();
    assert_eq!(s.score_value(), Some(0));
}

#[test]
fn reset_from_idle_is_a_no_op() {
    let mut s = GameSession::default();
    s.reset();
    assert_eq!(s.state(), SessionState::Idle);
    assert_eq!(s.attempts(), 0);
    assert!(s.markers().is_empty());
    assert!(s.target().is_none());
}

#[test]
fn reset_discards_placement_from_any_state() {
    let t0 = Instant::now();
    let mut s = playing_session(placement(0.5, 0.5, 50.0), t0);
    s.handle_click((400.0, 300.0), size_800x600(), t0).unwrap();
    assert_eq!(s.state(), SessionState::Won);

    s.reset();
    assert_eq!(s.state(), SessionState::Idle);
    assert!(s.target().is_none());
    assert!(s.markers().is_empty());
    assert_eq!(s.score_value(), None);
}

#[test]
fn non_image_selection_is_rejected_without_state_change() {
    let mut s = GameSession::default();
    let err = s.image_selected("application/pdf").unwrap_err();
    assert!(matches!(err, SessionError::InvalidFileType(_)));
    assert_eq!(s.state(), SessionState::Idle);
}

#[test]
fn superseded_upload_response_is_stale() {
    let t0 = Instant::now();
    let mut s = GameSession::default();

    let first = s.image_selected("image/png").unwrap();
    // A second upload starts while the first is still in flight.
    let second = s.image_selected("image/png").unwrap();

    // The first response eventually resolves; it must not transition state.
    let err = s
        .processing_complete(first, Ok(placement(0.1, 0.1, 50.0)), t0)
        .unwrap_err();
    assert_eq!(err, SessionError::StaleResponse);
    assert_eq!(s.state(), SessionState::Uploading);

    s.processing_complete(second, Ok(placement(0.9, 0.9, 50.0)), t0)
        .unwrap();
    assert_eq!(s.state(), SessionState::Playing);
    assert_eq!(s.target().unwrap().x_norm, 0.9);
}

#[test]
fn reset_invalidates_in_flight_processing() {
    let t0 = Instant::now();
    let mut s = GameSession::default();
    let token = s.image_selected("image/png").unwrap();
    s.reset();

    let err = s
        .processing_complete(token, Ok(placement(0.5, 0.5, 50.0)), t0)
        .unwrap_err();
    assert_eq!(err, SessionError::StaleResponse);
    assert_eq!(s.state(), SessionState::Idle);
    assert!(s.target().is_none());
}

#[test]
fn upstream_failure_returns_to_idle_with_reason() {
    let t0 = Instant::now();
    let mut s = GameSession::default();
    let token = s.image_selected("image/png").unwrap();
    s.processing_complete(token, Err("detector unavailable".to_string()), t0)
        .unwrap();
    assert_eq!(s.state(), SessionState::Idle);
    assert!(s.target().is_none());
    assert_eq!(s.last_failure(), Some("detector unavailable"));
}

#[test]
fn interactive_events_rejected_while_uploading() {
    let t0 = Instant::now();
    let mut s = GameSession::default();
    s.image_selected("image/png").unwrap();

    let rendered = size_800x600();
    assert!(matches!(
        s.handle_click((1.0, 1.0), rendered, t0).unwrap_err(),
        SessionError::NotAllowed(SessionState::Uploading)
    ));
    assert!(s.give_up(t0).is_err());
    assert!(s.play_again(t0).is_err());
    assert_eq!(s.state(), SessionState::Uploading);
}

#[test]
fn ready_state_variant_starts_on_begin_round() {
    let t0 = Instant::now();
    let mut s = GameSession::new(SessionConfig {
        auto_start: false,
        ..SessionConfig::default()
    });
    let token = s.image_selected("image/png").unwrap();
    s.processing_complete(token, Ok(placement(0.5, 0.5, 50.0)), t0)
        .unwrap();
    assert_eq!(s.state(), SessionState::Ready);
    assert_eq!(s.elapsed(t0 + Duration::from_secs(9)), Duration::ZERO);

    s.begin_round(t0 + Duration::from_secs(10)).unwrap();
    assert_eq!(s.state(), SessionState::Playing);
    assert_eq!(
        s.elapsed(t0 + Duration::from_secs(12)),
        Duration::from_secs(2)
    );
}

#[test]
fn view_hides_target_until_round_ends() {
    let t0 = Instant::now();
    let mut s = playing_session(placement(0.5, 0.5, 50.0), t0);
    assert!(s.view(t0).target.is_none());

    s.give_up(t0).unwrap();
    let view = s.view(t0);
    assert!(view.target.is_some());
    assert_eq!(view.state, SessionState::Revealed);
}
