use super::*;
use crate::{
    engine::memory::InMemoryEngine,
    foundation::core::{AspectRatio, JobId},
    slides::{color::ColorSpec, row::ContentRow},
};

fn rows(n: usize) -> RowTable {
    RowTable::from_rows((0..n).map(|i| ContentRow::new(format!("Slide {i}"), "text"))).unwrap()
}

fn theme() -> Theme {
    Theme::new(AspectRatio::Square1x1, ColorSpec::PRESETS[4].into())
}

struct Panicky;

impl EncodeEngine for Panicky {
    fn name(&self) -> &str {
        "panicky"
    }

    fn ensure_ready(&mut self) -> Result<(), EncodeError> {
        Ok(())
    }

    fn encode(&mut self, job: &JobSpec) -> Result<Vec<u8>, EncodeError> {
        match job.id().0 {
            0 => panic!("renderer exploded"),
            1 => Ok(Vec::new()),
            _ => Ok(b"ok".to_vec()),
        }
    }
}

#[test]
fn panics_and_empty_payloads_become_failures() {
    let orch = Orchestrator::new(Panicky);
    let run = orch
        .submit(&rows(3), 3, &theme(), RowPolicy::AllOrNothing)
        .unwrap();
    let outcomes: Vec<JobOutcome> = run.collect();

    assert_eq!(outcomes.len(), 3);
    assert_eq!(
        outcomes[0].failure_reason(),
        Some("engine panicked: renderer exploded")
    );
    assert_eq!(outcomes[1].failure_reason(), Some("engine returned no data"));
    assert!(outcomes[2].is_success());
}

#[test]
fn setup_failure_opens_no_batch() {
    let orch = Orchestrator::new(InMemoryEngine::new().unavailable("ffmpeg missing"));
    let err = orch
        .submit(&rows(2), 2, &theme(), RowPolicy::AllOrNothing)
        .err()
        .unwrap();
    assert!(matches!(err, ReelError::EngineUnavailable(ref r) if r == "ffmpeg missing"));
    orch.with_engine(|e| assert!(e.encoded().is_empty()));
}

#[test]
fn incomplete_rows_never_reach_the_engine() {
    let orch = Orchestrator::new(InMemoryEngine::new());
    let err = orch
        .submit(&rows(1), 2, &theme(), RowPolicy::AllOrNothing)
        .err()
        .unwrap();
    assert!(matches!(err, ReelError::IncompleteInput { .. }));
    orch.with_engine(|e| {
        assert_eq!(e.setup_calls(), 0);
        assert!(e.encoded().is_empty());
    });
    assert_eq!(orch.current_batch(), None);
}

#[test]
fn each_batch_calls_setup_once_before_its_jobs() {
    let orch = Orchestrator::new(InMemoryEngine::new());
    orch.submit(&rows(2), 2, &theme(), RowPolicy::AllOrNothing)
        .unwrap()
        .run_to_end();
    orch.submit(&rows(2), 2, &theme(), RowPolicy::AllOrNothing)
        .unwrap()
        .run_to_end();
    orch.with_engine(|e| {
        assert_eq!(e.setup_calls(), 2);
        assert_eq!(e.encoded(), &[JobId(0), JobId(1), JobId(0), JobId(1)]);
    });
}

#[test]
fn superseded_run_stops_between_jobs() {
    let orch = Orchestrator::new(InMemoryEngine::new());
    let mut first = orch
        .submit(&rows(4), 4, &theme(), RowPolicy::AllOrNothing)
        .unwrap();
    assert!(first.next().is_some());

    let second = orch
        .submit(&rows(2), 2, &theme(), RowPolicy::AllOrNothing)
        .unwrap();
    assert!(second.id() > first.id());
    assert_eq!(orch.current_batch(), Some(second.id()));

    assert!(first.next().is_none());
    assert!(first.next().is_none());
    let summary = first.summary();
    assert!(summary.cancelled);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(first.store().count(), 1);
    assert!(!first.store().is_complete());

    let summary = second.run_to_end();
    assert!(!summary.cancelled);
    assert_eq!(summary.succeeded, 2);
}

#[test]
fn size_hint_tracks_remaining_jobs() {
    let orch = Orchestrator::new(InMemoryEngine::new());
    let mut run = orch
        .submit(&rows(3), 3, &theme(), RowPolicy::AllOrNothing)
        .unwrap();
    assert_eq!(run.size_hint(), (0, Some(3)));
    run.next();
    assert_eq!(run.size_hint(), (0, Some(2)));
}

/// Becomes unavailable after its first setup.
#[derive(Default)]
struct FlakySetup {
    setups: usize,
    encoded: usize,
}

impl EncodeEngine for FlakySetup {
    fn name(&self) -> &str {
        "flaky"
    }

    fn ensure_ready(&mut self) -> Result<(), EncodeError> {
        self.setups += 1;
        if self.setups > 1 {
            return Err(EncodeError::new("device lost"));
        }
        Ok(())
    }

    fn encode(&mut self, _job: &JobSpec) -> Result<Vec<u8>, EncodeError> {
        self.encoded += 1;
        Ok(b"ok".to_vec())
    }
}

#[test]
fn failed_setup_leaves_running_batch_alone() {
    let orch = Orchestrator::new(FlakySetup::default());
    let mut first = orch
        .submit(&rows(3), 3, &theme(), RowPolicy::AllOrNothing)
        .unwrap();
    assert!(first.next().is_some());

    let err = orch
        .submit(&rows(1), 1, &theme(), RowPolicy::AllOrNothing)
        .err()
        .unwrap();
    assert!(matches!(err, ReelError::EngineUnavailable(ref r) if r == "device lost"));
    assert_eq!(orch.current_batch(), Some(first.id()));

    assert_eq!(first.by_ref().count(), 2);
    let summary = first.summary();
    assert!(!summary.cancelled);
    assert_eq!(summary.succeeded, 3);
    orch.with_engine(|e| assert_eq!(e.encoded, 3));
}
