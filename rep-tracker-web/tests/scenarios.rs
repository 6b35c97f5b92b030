//! End-to-end scenarios for the rep engine.
//!
//! Frames are built from deterministic synthetic bodies: a standing figure
//! whose knees bend to an exact hip-knee-ankle angle. No randomness, no
//! browser; everything runs through the native Rust API.

use approx::assert_abs_diff_eq;
use rep_tracker_web::pose::{
    LEFT_ANKLE, LEFT_HIP, LEFT_KNEE, LEFT_SHOULDER, NOSE, RIGHT_ANKLE, RIGHT_HIP, RIGHT_KNEE,
    RIGHT_SHOULDER,
};
use rep_tracker_web::{
    decode_frame, EngineConfig, ExerciseKind, FrameOutput, Landmark, LandmarkFrame, LockEvent,
    LockState, Person, PersonDescriptor, Phase, RepEngine, PERSON_STRIDE,
};

/// Standing figure centred on `cx` with both knees at `knee_deg`
fn body(cx: f32, knee_deg: f32) -> Person {
    let mut landmarks = vec![Landmark::default(); 33];
    // Knee pushed forward by d gives an isosceles hip-knee-ankle triangle
    let half = ((180.0 - knee_deg) / 2.0).to_radians();
    let d = 0.2 * half.tan();

    let mut put = |index: usize, x: f32, y: f32| {
        landmarks[index] = Landmark::new(x, y, 0.0, 0.9);
    };
    put(NOSE, cx, 0.1);
    put(LEFT_SHOULDER, cx - 0.15, 0.25);
    put(RIGHT_SHOULDER, cx + 0.15, 0.25);
    put(LEFT_HIP, cx - 0.1, 0.5);
    put(RIGHT_HIP, cx + 0.1, 0.5);
    put(LEFT_KNEE, cx - 0.1 + d, 0.7);
    put(RIGHT_KNEE, cx + 0.1 + d, 0.7);
    put(LEFT_ANKLE, cx - 0.1, 0.9);
    put(RIGHT_ANKLE, cx + 0.1, 0.9);
    Person::new(landmarks)
}

/// Four confident corners of a `w x h` box around `center`
fn box_person(center: (f32, f32), w: f32, h: f32) -> Person {
    let (cx, cy) = center;
    Person::new(vec![
        Landmark::new(cx - w / 2.0, cy - h / 2.0, 0.0, 0.9),
        Landmark::new(cx + w / 2.0, cy - h / 2.0, 0.0, 0.9),
        Landmark::new(cx - w / 2.0, cy + h / 2.0, 0.0, 0.9),
        Landmark::new(cx + w / 2.0, cy + h / 2.0, 0.0, 0.9),
    ])
}

fn solo(knee_deg: f32) -> LandmarkFrame {
    LandmarkFrame::new(0.0, vec![body(0.5, knee_deg)])
}

fn run(engine: &mut RepEngine, angles: &[f32]) -> Vec<FrameOutput> {
    angles.iter().map(|&a| engine.process_frame(&solo(a))).collect()
}

/// Deterministic sequence in [lo, hi)
fn lcg_angles(seed: u32, n: usize, lo: f32, hi: f32) -> Vec<f32> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            lo + (state >> 8) as f32 / (1u32 << 24) as f32 * (hi - lo)
        })
        .collect()
}

#[test]
fn test_body_fixture_has_requested_angle() {
    let mut engine = RepEngine::with_defaults(ExerciseKind::Squat);
    for deg in [80.0, 120.0, 170.0] {
        let out = engine.process_frame(&solo(deg));
        assert_abs_diff_eq!(out.angle.unwrap(), deg, epsilon = 0.1);
    }
}

#[test]
fn test_squat_scenario_counts_one_rep() {
    let mut engine = RepEngine::with_defaults(ExerciseKind::Squat);
    let outs = run(&mut engine, &[170.0, 165.0, 85.0, 80.0, 170.0]);

    let events: Vec<_> = outs.iter().filter_map(|o| o.rep_event).collect();
    assert_eq!(events.len(), 1);
    assert_abs_diff_eq!(events[0].depth_deg, 80.0, epsilon = 0.1);
    let last = outs.last().unwrap();
    assert_eq!(last.phase, Phase::Up);
    assert_eq!(last.reps, 1);
}

#[test]
fn test_oscillation_in_dead_zone_counts_nothing() {
    let mut engine = RepEngine::with_defaults(ExerciseKind::Squat);
    for out in run(&mut engine, &[150.0, 145.0, 150.0, 148.0, 151.0]) {
        assert_eq!(out.reps, 0);
        assert_eq!(out.phase, Phase::Neutral);
    }
}

#[test]
fn test_one_rep_per_full_cycle() {
    let mut engine = RepEngine::with_defaults(ExerciseKind::Squat);
    let mut angles = Vec::new();
    for _ in 0..5 {
        angles.extend_from_slice(&[170.0, 130.0, 75.0, 130.0]);
    }
    angles.push(170.0);
    // Extra UP readings with no DOWN in between
    angles.extend_from_slice(&[168.0, 175.0, 170.0]);

    let outs = run(&mut engine, &angles);
    assert_eq!(outs.last().unwrap().reps, 5);
    assert_eq!(outs.iter().filter(|o| o.rep_event.is_some()).count(), 5);

    // Monotone while the set runs
    for pair in outs.windows(2) {
        assert!(pair[1].reps >= pair[0].reps);
    }
}

#[test]
fn test_reset_from_any_state() {
    let cases: [Vec<f32>; 3] = [vec![], vec![170.0, 80.0], vec![170.0, 60.0, 170.0, 90.0, 170.0]];
    for angles in cases {
        let mut engine = RepEngine::with_defaults(ExerciseKind::Squat);
        run(&mut engine, &angles);
        engine.reset();
        let snap = engine.snapshot();
        assert_eq!(snap.reps, 0);
        assert_eq!(snap.accuracy, 100);
        assert_eq!(snap.phase, Phase::Neutral);
    }
}

#[test]
fn test_accuracy_always_in_range() {
    for kind in [ExerciseKind::Squat, ExerciseKind::Pushup, ExerciseKind::Lunge, ExerciseKind::Generic] {
        let mut engine = RepEngine::with_defaults(kind);
        for deg in lcg_angles(7, 400, 20.0, 180.0) {
            let out = engine.process_frame(&solo(deg));
            assert!(out.accuracy <= 100);
        }
    }

    // All-invalid frames: nobody confident enough
    let mut engine = RepEngine::with_defaults(ExerciseKind::Squat);
    let mut dim = body(0.5, 80.0);
    for lm in dim.landmarks.iter_mut() {
        lm.confidence = 0.1;
    }
    for _ in 0..50 {
        let out = engine.process_frame(&LandmarkFrame::new(0.0, vec![dim.clone()]));
        assert_eq!(out.accuracy, 100);
        assert!(out.angle.is_none());
        assert_eq!(out.phase, Phase::Neutral);
    }
}

#[test]
fn test_locked_person_ignores_bystander_reps() {
    let mut engine = RepEngine::with_defaults(ExerciseKind::Squat);
    engine.process_frame(&LandmarkFrame::new(0.0, vec![body(0.3, 170.0)]));
    assert!(engine.lock_current());

    // Bystander on the right completes full reps while the target stands still
    for deg in [170.0, 80.0, 170.0, 80.0, 170.0] {
        let f = LandmarkFrame::new(0.0, vec![body(0.3, 170.0), body(0.75, deg)]);
        engine.process_frame(&f);
    }
    assert_eq!(engine.reps(), 0);

    // Bystander alone: withheld entirely
    for deg in [80.0, 170.0, 80.0, 170.0] {
        let out = engine.process_frame(&LandmarkFrame::new(0.0, vec![body(0.75, deg)]));
        assert!(!out.accepted);
    }
    assert_eq!(engine.reps(), 0);
    assert_eq!(engine.lock_state(), LockState::Locked);

    // Target's own reps count, even with the bystander in frame
    for deg in [170.0, 80.0, 170.0] {
        let f = LandmarkFrame::new(0.0, vec![body(0.75, 170.0), body(0.3, deg)]);
        let out = engine.process_frame(&f);
        assert!(out.accepted);
    }
    assert_eq!(engine.reps(), 1);
}

#[test]
fn test_lock_lost_after_patience() {
    let config = EngineConfig::default();
    let patience = config.lock_patience;
    let mut engine = RepEngine::new(ExerciseKind::Squat, &config);
    engine.lock(PersonDescriptor::new((0.5, 0.5), 0.2, 0.4));

    let stranger = LandmarkFrame::new(0.0, vec![box_person((0.9, 0.9), 0.2, 0.4)]);
    let mut lost_events = 0;
    for i in 1..=patience + 10 {
        let out = engine.process_frame(&stranger);
        assert!(!out.accepted);
        assert_eq!(out.reps, 0);
        if out.lock_event == Some(LockEvent::Lost) {
            lost_events += 1;
        }
        let expected = if i < patience { LockState::Locked } else { LockState::Lost };
        assert_eq!(out.lock_state, expected, "frame {}", i);
    }
    assert_eq!(lost_events, 1);

    // The target comes back
    let back = LandmarkFrame::new(0.0, vec![box_person((0.51, 0.5), 0.2, 0.4)]);
    let out = engine.process_frame(&back);
    assert_eq!(out.lock_event, Some(LockEvent::Reacquired));
    assert_eq!(out.lock_state, LockState::Locked);
    assert!(out.accepted);
}

#[test]
fn test_lost_pauses_until_unlock() {
    let config = EngineConfig { lock_patience: 2, ..EngineConfig::default() };
    let mut engine = RepEngine::new(ExerciseKind::Squat, &config);
    engine.lock(PersonDescriptor::new((0.1, 0.1), 0.05, 0.05));

    for deg in [170.0, 80.0, 170.0] {
        engine.process_frame(&solo(deg));
    }
    assert_eq!(engine.lock_state(), LockState::Lost);
    assert_eq!(engine.reps(), 0);
    assert_eq!(engine.phase(), Phase::Neutral);

    engine.unlock();
    run(&mut engine, &[170.0, 80.0, 170.0]);
    assert_eq!(engine.reps(), 1);
    assert_eq!(engine.lock_state(), LockState::Unlocked);
}

#[test]
fn test_wire_buffer_feeds_engine() {
    let person = body(0.5, 80.0);
    let mut data = Vec::with_capacity(PERSON_STRIDE);
    for lm in &person.landmarks {
        data.extend_from_slice(&[lm.x, lm.y, lm.z, lm.confidence]);
    }
    let frame = decode_frame(&data, 40.0).unwrap();

    let mut engine = RepEngine::with_defaults(ExerciseKind::Squat);
    let out = engine.process_frame(&frame);
    assert_eq!(out.phase, Phase::Down);
    assert_eq!(out.timestamp_ms, 40.0);
}
