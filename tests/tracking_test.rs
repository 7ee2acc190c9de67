use nalgebra::Point2;
use turret_track::integration::{DetectionSource, Frame, Recording};
use turret_track::tracker::ENGAGE_SEQUENCE;
use turret_track::{
    Command, Detection, EngagementConfig, MemoryLink, TrackState, TrackerConfig, TrackerPipeline,
    TurretTracker,
};

fn centered(cx: f32, cy: f32) -> Detection {
    Detection::new(0, cx - 15.0, cy - 30.0, cx + 15.0, cy + 30.0, 0.9)
}

fn count(commands: &[Command], wanted: Command) -> usize {
    commands.iter().filter(|c| **c == wanted).count()
}

#[test]
fn test_nearest_box_to_origin_is_selected() {
    let tracker = TurretTracker::default();
    let mut state = TrackState::new();

    let out = tracker.update(
        &mut state,
        &[centered(100.0, 100.0), centered(10.0, 10.0)],
        (640, 480),
    );
    assert_eq!(out.target.unwrap().center(), Point2::new(10.0, 10.0));
}

#[test]
fn test_lost_voiceline_fires_once_on_eighth_frame() {
    let tracker = TurretTracker::new(TrackerConfig {
        engagement: EngagementConfig {
            voiceline_threshold: 8,
            close_threshold: 20,
            explicit_fire_off: false,
        },
        ..TrackerConfig::default()
    });
    let mut state = TrackState::new();

    for frame in 1..=20 {
        let out = tracker.update(&mut state, &[], (640, 480));
        let lost = count(&out.commands, Command::VoicelineLost);
        assert_eq!(lost, usize::from(frame == 8), "frame {frame}");
    }
}

#[test]
fn test_frame_center_aims_straight_with_bias() {
    let tracker = TurretTracker::new(TrackerConfig {
        smoothing_alpha: 1.0,
        yaw_limit: 30.0,
        pitch_limit: 50.0,
        pitch_bias: 10.0,
        ..TrackerConfig::default()
    });
    let mut state = TrackState::new();

    let out = tracker.update(&mut state, &[centered(320.0, 240.0)], (640, 480));
    let aim = out.aim.unwrap();
    assert!(aim.yaw.abs() < 1e-5);
    assert!((aim.pitch - 10.0).abs() < 1e-5);
    assert_eq!(out.commands.last().unwrap().to_string(), "AP10.00Y0.00");
}

#[test]
fn test_engage_then_disengage_exactly_once() {
    let tracker = TurretTracker::default();
    let mut state = TrackState::new();

    let first = tracker.update(&mut state, &[centered(200.0, 200.0)], (640, 480));
    assert_eq!(&first.commands[..4], &ENGAGE_SEQUENCE);

    let mut closes = Vec::new();
    for frame in 1..=25 {
        let out = tracker.update(&mut state, &[], (640, 480));
        assert_eq!(count(&out.commands, Command::Open), 0);
        if out.commands.contains(&Command::Close) {
            closes.push(frame);
            assert_eq!(
                out.commands,
                vec![Command::Close, Command::RevOff, Command::VoicelineClose]
            );
        }
    }
    assert_eq!(closes, vec![21]);
    assert!(!state.is_engaged());
}

#[test]
fn test_short_gap_never_closes() {
    let tracker = TurretTracker::default();
    let mut state = TrackState::new();
    let mut all = Vec::new();

    all.extend(tracker.update(&mut state, &[centered(200.0, 200.0)], (640, 480)).commands);
    for _ in 0..8 {
        all.extend(tracker.update(&mut state, &[], (640, 480)).commands);
    }
    all.extend(tracker.update(&mut state, &[centered(210.0, 200.0)], (640, 480)).commands);

    assert_eq!(count(&all, Command::VoicelineLost), 1);
    assert_eq!(count(&all, Command::Close), 0);
    assert_eq!(count(&all, Command::Open), 1);
    assert!(state.is_engaged());
}

#[test]
fn test_far_target_in_recording_is_aimed() {
    let recording = Recording::from_json(
        r#"{"width": 640, "height": 480,
            "frames": [[{"class_id": 0, "bbox": [3e19, 3e19, 3.1e19, 3.1e19]}]]}"#,
    )
    .unwrap();
    let (mut frames, detector) = recording.into_parts();

    let mut pipeline = TrackerPipeline::with_default_config(detector, MemoryLink::new());
    let stats = pipeline.run(&mut frames, &std::sync::atomic::AtomicBool::new(false));

    assert_eq!(stats.frames_with_target, 1);
    assert!(pipeline.state().is_engaged());
    assert_eq!(pipeline.link().sent().iter().filter(|c| c.is_aim()).count(), 1);
}

#[test]
fn test_replayed_recording_drives_pipeline() {
    let recording = Recording::from_json(
        r#"{
            "width": 640,
            "height": 480,
            "frames": [
                [{"class_id": 0, "bbox": [300, 200, 340, 280]}],
                [{"class_id": 0, "bbox": [310, 200, 350, 280]},
                 {"class_id": 0, "bbox": [20, 20, 60, 100]}],
                [{"class_id": 56, "bbox": [0, 0, 50, 50]}]
            ]
        }"#,
    )
    .unwrap();
    let (mut frames, detector) = recording.into_parts();

    let mut pipeline = TrackerPipeline::with_default_config(detector, MemoryLink::new());
    let stats = pipeline.run(&mut frames, &std::sync::atomic::AtomicBool::new(false));

    assert_eq!(stats.frames, 3);
    assert_eq!(stats.frames_with_target, 2);
    assert_eq!(
        pipeline.state().last_target_position,
        Point2::new(330.0, 240.0)
    );

    let sent = pipeline.link().sent();
    assert_eq!(sent.iter().filter(|c| c.is_aim()).count(), 2);
    assert_eq!(count(sent, Command::Open), 1);
}

#[test]
fn test_custom_detector_plugs_in() {
    struct Alternating(u64);

    impl DetectionSource for Alternating {
        type Error = std::convert::Infallible;

        fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Self::Error> {
            self.0 += 1;
            Ok(if frame.id % 2 == 0 {
                vec![centered(100.0, 100.0)]
            } else {
                vec![]
            })
        }
    }

    let mut pipeline = TrackerPipeline::with_default_config(Alternating(0), MemoryLink::new());
    for id in 0..10 {
        pipeline
            .process_frame(&Frame::new(id, 640, 480, Vec::new()))
            .unwrap();
    }
    assert_eq!(pipeline.detector().0, 10);
    assert!(pipeline.state().is_engaged());
    assert_eq!(count(pipeline.link().sent(), Command::VoicelineLost), 0);
}
