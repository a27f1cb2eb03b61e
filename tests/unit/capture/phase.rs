use super::*;

#[test]
fn one_shot_walks_the_cycle_in_order() {
    let mut phase = Phase::Ready;
    let mut seen = vec![phase];
    while phase != Phase::Done {
        phase = phase.next(false);
        seen.push(phase);
    }
    assert_eq!(
        seen,
        [
            Phase::Ready,
            Phase::Pose,
            Phase::Smile,
            Phase::Flash,
            Phase::Grab,
            Phase::Cooldown,
            Phase::Done
        ]
    );
}

#[test]
fn cooldown_loops_while_shots_remain() {
    assert_eq!(Phase::Cooldown.next(true), Phase::Ready);
    assert_eq!(Phase::Done.next(true), Phase::Done);
}

#[test]
fn labels_exist_only_for_countdown() {
    assert_eq!(Phase::Ready.countdown_label(), Some("1 Get Ready!"));
    assert_eq!(Phase::Pose.countdown_label(), Some("2 Pose"));
    assert_eq!(Phase::Smile.countdown_label(), Some("3 Smile!"));
    assert!(!Phase::Flash.is_countdown());
    assert!(!Phase::Grab.is_countdown());
}

#[test]
fn default_durations() {
    let t = PhaseTimings::default();
    assert_eq!(Phase::Ready.duration(&t), Duration::from_millis(1000));
    assert_eq!(Phase::Flash.duration(&t), Duration::from_millis(150));
    assert_eq!(Phase::Cooldown.duration(&t), Duration::from_millis(700));
    assert_eq!(Phase::Grab.duration(&t), Duration::ZERO);
    assert_eq!(t.per_shot(), Duration::from_millis(3850));
    assert_eq!(PhaseTimings::INSTANT.per_shot(), Duration::ZERO);
}

#[test]
fn timings_fill_missing_fields_from_defaults() {
    let t: PhaseTimings = serde_json::from_str(r#"{"flash_ms": 90}"#).unwrap();
    assert_eq!(t.flash_ms, 90);
    assert_eq!(t.ready_ms, 1000);
    assert!(serde_json::from_str::<PhaseTimings>(r#"{"nope": 1}"#).is_err());
}
