use super::*;
use crate::camera::source::{SyntheticSource, UnavailableSource};
use crate::capture::clock::ManualClock;
use crate::filters::registry::FilterRegistry;

fn filter(name: &str) -> FilterDescriptor {
    FilterRegistry::builtin()
        .unwrap()
        .resolve(name)
        .unwrap()
        .clone()
}

#[derive(Default)]
struct Recorder {
    phases: Vec<(Phase, usize)>,
    captured: Vec<usize>,
    skipped: Vec<usize>,
}

impl SequenceObserver for Recorder {
    fn phase_entered(&mut self, phase: Phase, shot: usize) {
        self.phases.push((phase, shot));
    }
    fn frame_captured(&mut self, index: usize, _frame: &ImageFrame) {
        self.captured.push(index);
    }
    fn shot_skipped(&mut self, shot: usize, _err: &BoothError) {
        self.skipped.push(shot);
    }
}

#[test]
fn run_produces_one_frame_per_shot() {
    for shots in [2u8, 3, 4] {
        let mut cam = SyntheticSource::new(16, 12);
        cam.open().unwrap();
        let run = CaptureRun::new(shots, filter("Sepia"), PhaseTimings::default(), 1).unwrap();
        let session = run_capture(run, &mut cam, &mut ManualClock::new(), &mut NoopObserver);
        assert!(session.is_done());
        assert_eq!(session.frames().len(), usize::from(shots));
        assert!(session.skipped_shots().is_empty());
        for f in session.frames() {
            assert_eq!((f.width, f.height), (16, 12));
        }
    }
}

#[test]
fn frames_are_mirrored() {
    let mut cam = SyntheticSource::new(8, 8);
    cam.open().unwrap();
    let run = CaptureRun::new(2, filter("None"), PhaseTimings::INSTANT, 0).unwrap();
    let session = run_capture(run, &mut cam, &mut ManualClock::new(), &mut NoopObserver);
    let frame = session.frames()[0].decode().unwrap();
    // The bright marker sits top-left on the camera, so top-right once mirrored.
    assert_eq!(frame.pixel(7, 0), [250, 250, 250, 255]);
    assert_ne!(frame.pixel(0, 0), [250, 250, 250, 255]);
}

#[test]
fn grayscale_timing_per_shot() {
    let mut cam = SyntheticSource::new(4, 4);
    cam.open().unwrap();
    let run = CaptureRun::new(2, filter("Grayscale"), PhaseTimings::default(), 1).unwrap();
    let mut clock = ManualClock::new();
    let session = run_capture(run, &mut cam, &mut clock, &mut NoopObserver);
    assert_eq!(session.frames().len(), 2);

    let ms: Vec<u128> = clock.waits().iter().map(|d| d.as_millis()).collect();
    assert_eq!(ms, [1000, 1000, 1000, 150, 700, 1000, 1000, 1000, 150, 700]);
    assert_eq!(clock.elapsed(), Duration::from_millis(7700));

    let gray = session.frames()[1].decode().unwrap();
    let [r, g, b, _] = gray.pixel(3, 3);
    assert!(r.abs_diff(g) <= 1 && g.abs_diff(b) <= 1);
}

#[test]
fn observer_sees_phases_in_order() {
    let mut cam = SyntheticSource::new(4, 4);
    cam.open().unwrap();
    let run = CaptureRun::new(2, filter("None"), PhaseTimings::INSTANT, 0).unwrap();
    let mut rec = Recorder::default();
    run_capture(run, &mut cam, &mut ManualClock::new(), &mut rec);

    let cycle = [
        Phase::Ready,
        Phase::Pose,
        Phase::Smile,
        Phase::Flash,
        Phase::Grab,
        Phase::Cooldown,
    ];
    let expected: Vec<(Phase, usize)> = (0..2)
        .flat_map(|shot| cycle.iter().map(move |p| (*p, shot)))
        .collect();
    assert_eq!(rec.phases, expected);
    assert_eq!(rec.captured, [0, 1]);
}

#[test]
fn single_failed_read_is_retried() {
    let mut cam = SyntheticSource::new(4, 4).with_failing_reads([0]);
    cam.open().unwrap();
    let run = CaptureRun::new(2, filter("None"), PhaseTimings::INSTANT, 1).unwrap();
    let session = run_capture(run, &mut cam, &mut ManualClock::new(), &mut NoopObserver);
    assert_eq!(session.frames().len(), 2);
    assert_eq!(cam.reads(), 3);
}

#[test]
fn shot_is_skipped_after_retries_run_out() {
    let mut cam = SyntheticSource::new(4, 4).with_failing_reads([1, 2]);
    cam.open().unwrap();
    let run = CaptureRun::new(3, filter("None"), PhaseTimings::INSTANT, 1).unwrap();
    let mut rec = Recorder::default();
    let session = run_capture(run, &mut cam, &mut ManualClock::new(), &mut rec);
    assert_eq!(session.frames().len(), 2);
    assert_eq!(session.skipped_shots(), [1]);
    assert_eq!(rec.skipped, [1]);
    assert!(session.is_done());
}

#[test]
fn unavailable_camera_still_terminates() {
    let mut cam = UnavailableSource::default();
    let run = CaptureRun::new(2, filter("Vignette"), PhaseTimings::INSTANT, 1).unwrap();
    let session = run_capture(run, &mut cam, &mut ManualClock::new(), &mut NoopObserver);
    assert!(session.is_done());
    assert!(session.frames().is_empty());
    assert_eq!(session.skipped_shots(), [0, 1]);
}

#[test]
fn invalid_shot_counts_are_rejected() {
    assert!(CaptureRun::new(1, filter("None"), PhaseTimings::INSTANT, 0).is_err());
    assert!(CaptureRun::new(5, filter("None"), PhaseTimings::INSTANT, 0).is_err());
}

#[test]
fn tick_after_done_is_inert() {
    let mut cam = SyntheticSource::new(2, 2);
    cam.open().unwrap();
    let mut run = CaptureRun::new(2, filter("None"), PhaseTimings::INSTANT, 0).unwrap();
    while run.tick(&mut cam, &mut NoopObserver).is_some() {}
    assert_eq!(run.phase(), Phase::Done);
    assert_eq!(run.tick(&mut cam, &mut NoopObserver), None);
    assert_eq!(run.session().frames().len(), 2);
}
