//! Sequential case runner.
//!
//! Cases run one at a time, suite by suite, in registration order. Each case
//! body is called under `catch_unwind`, so a misbehaving case never aborts
//! the run:
//!
//! | body ends with                    | status        |
//! |-----------------------------------|---------------|
//! | `Ok(())` or `Err(Stop::Pass)`     | `Passed`      |
//! | `Err(Stop::Fail(soft))`           | `SoftFailed`  |
//! | `Err(Stop::Fail(hard))`           | `HardFailed`  |
//! | `Err(Stop::Foreign(_))`           | `Crashed`     |
//! | panic with a `FailureSignal`      | by severity   |
//! | any other panic                   | `Crashed`     |
//!
//! There is no timeout: a case that never returns hangs the run.

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use crate::raise::{QuietPanics, payload_message};
use crate::registry::{self, CaseRegistry, TestCase};
use crate::report::{CaseOutcome, CaseStatus, RunReport};
use crate::signal::{FailureSignal, Stop};

/// Global run state.
///
/// A runner starts `Idle`, is `Executing` while it iterates the registry and
/// is `Completed` once the report is final. Running again goes through
/// `Executing` once more. Observers see every transition through
/// [`Observer::state_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Executing,
    Completed,
}

/// Receives progress while a run executes. All methods default to no-ops.
///
/// Each case is pending until [`Observer::case_started`] (running) and
/// terminal from [`Observer::case_finished`], whose outcome carries the
/// terminal status.
pub trait Observer {
    fn state_changed(&mut self, _state: RunState) {}

    fn run_started(&mut self, _total: usize) {}

    fn case_started(&mut self, _case: &TestCase) {}

    fn case_finished(&mut self, _outcome: &CaseOutcome) {}

    fn run_finished(&mut self, _report: &RunReport) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

/// Executes every case of a registry and builds a [`RunReport`].
pub struct Runner<'a> {
    registry: &'a CaseRegistry,
    state: RunState,
}

impl<'a> Runner<'a> {
    pub fn new(registry: &'a CaseRegistry) -> Self {
        Self {
            registry,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Run every case. A runner can be run again; each run produces a fresh
    /// report.
    pub fn run(&mut self, observer: &mut dyn Observer) -> RunReport {
        self.transition(RunState::Executing, observer);
        let total = self.registry.len();
        tracing::debug!(
            cases = total,
            suites = self.registry.suite_count(),
            "run started"
        );
        observer.run_started(total);

        let started = Instant::now();
        let mut outcomes = Vec::with_capacity(total);
        {
            let _quiet = QuietPanics::install();
            for suite in self.registry.suites() {
                for case in suite.cases {
                    observer.case_started(case);
                    let outcome = run_case(case);
                    observer.case_finished(&outcome);
                    outcomes.push(outcome);
                }
            }
        }

        let report = RunReport::new(outcomes, started.elapsed());
        self.transition(RunState::Completed, observer);
        tracing::info!(
            total = report.total(),
            passed = report.passed(),
            soft_failed = report.soft_failed(),
            hard_failed = report.hard_failed(),
            crashed = report.crashed(),
            "run completed"
        );
        observer.run_finished(&report);
        report
    }

    fn transition(&mut self, state: RunState, observer: &mut dyn Observer) {
        tracing::trace!(from = ?self.state, to = ?state, "run state");
        self.state = state;
        observer.state_changed(state);
    }
}

/// Run one case and classify how it ended.
pub fn run_case(case: &TestCase) -> CaseOutcome {
    tracing::debug!(suite = case.suite(), case = case.name(), "case started");
    let started = Instant::now();

    let status = match panic::catch_unwind(AssertUnwindSafe(|| case.call())) {
        Ok(Ok(())) | Ok(Err(Stop::Pass)) => CaseStatus::Passed,
        Ok(Err(Stop::Fail(signal))) => CaseStatus::failed(signal.severity, signal.message),
        Ok(Err(Stop::Foreign(message))) => CaseStatus::Crashed(message),
        Err(payload) => match payload.downcast::<FailureSignal>() {
            Ok(signal) => CaseStatus::failed(signal.severity, signal.message),
            Err(payload) => CaseStatus::Crashed(format!(
                "panicked: {}",
                payload_message(payload.as_ref())
            )),
        },
    };

    let duration = started.elapsed();
    tracing::debug!(
        suite = case.suite(),
        case = case.name(),
        status = status.label(),
        ?duration,
        "case finished"
    );

    CaseOutcome {
        suite: case.suite().to_string(),
        name: case.name().to_string(),
        status,
        duration,
    }
}

/// Seal the process-wide registry and run everything in it.
///
/// Calling this again runs the same cases again.
pub fn run_all() -> RunReport {
    run_all_with(&mut NoopObserver)
}

/// [`run_all`] with progress reported to `observer`.
pub fn run_all_with(observer: &mut dyn Observer) -> RunReport {
    let registry = registry::seal_global();
    Runner::new(&registry).run(observer)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::check::Check;
    use crate::raise::raise;
    use crate::signal::CaseResult;

    #[derive(Debug)]
    struct RuntimeKind;

    fn status_of(report: &RunReport, name: &str) -> CaseStatus {
        report
            .outcome("S", name)
            .map(|o| o.status.clone())
            .unwrap_or_else(|| panic!("no outcome for {name}"))
    }

    #[test]
    fn every_registered_case_gets_one_outcome() {
        let mut registry = CaseRegistry::new();
        registry.register("S", "pass", || Ok(())).unwrap();
        registry.register("S", "soft", || Check::soft().eq(1, 2)).unwrap();
        registry.register("T", "hard", || Check::hard().lt(2, 1)).unwrap();

        let mut runner = Runner::new(&registry);
        assert_eq!(runner.state(), RunState::Idle);
        let report = runner.run(&mut NoopObserver);
        assert_eq!(runner.state(), RunState::Completed);

        assert_eq!(report.total(), registry.len());
        assert_eq!(report.passed(), 1);
        assert_eq!(report.soft_failed(), 1);
        assert_eq!(report.hard_failed(), 1);
        let order: Vec<_> = report.outcomes().iter().map(|o| o.id()).collect();
        assert_eq!(order, vec!["S.pass", "S.soft", "T.hard"]);
    }

    #[test]
    fn first_failure_stops_the_case_for_both_severities() {
        let soft_marker = Arc::new(AtomicBool::new(false));
        let hard_marker = Arc::new(AtomicBool::new(false));

        let mut registry = CaseRegistry::new();
        let marker = soft_marker.clone();
        registry
            .register("S", "soft", move || -> CaseResult {
                Check::soft().eq(1, 2)?;
                marker.store(true, Ordering::SeqCst);
                Ok(())
            })
            .unwrap();
        let marker = hard_marker.clone();
        registry
            .register("S", "hard", move || -> CaseResult {
                Check::hard().eq(1, 2)?;
                marker.store(true, Ordering::SeqCst);
                Ok(())
            })
            .unwrap();

        let report = Runner::new(&registry).run(&mut NoopObserver);
        assert_eq!(status_of(&report, "soft"), CaseStatus::SoftFailed("1 != 2".into()));
        assert_eq!(status_of(&report, "hard"), CaseStatus::HardFailed("1 != 2".into()));
        assert!(!soft_marker.load(Ordering::SeqCst));
        assert!(!hard_marker.load(Ordering::SeqCst));
    }

    #[test]
    fn explicit_pass_skips_the_rest() {
        let reached = Arc::new(AtomicBool::new(false));
        let marker = reached.clone();

        let mut registry = CaseRegistry::new();
        registry
            .register("S", "early", move || -> CaseResult {
                crate::check::succeed()?;
                marker.store(true, Ordering::SeqCst);
                Check::hard().fail("unreachable")
            })
            .unwrap();

        let report = Runner::new(&registry).run(&mut NoopObserver);
        assert_eq!(status_of(&report, "early"), CaseStatus::Passed);
        assert!(!reached.load(Ordering::SeqCst));
    }

    #[test]
    fn foreign_errors_crash_only_their_case() {
        let mut registry = CaseRegistry::new();
        registry
            .register("S", "panics", || -> CaseResult {
                let v: Vec<u8> = Vec::new();
                std::hint::black_box(v[1]);
                Ok(())
            })
            .unwrap();
        registry
            .register("S", "typed_panic", || -> CaseResult {
                raise(RuntimeKind);
                Ok(())
            })
            .unwrap();
        registry
            .register("S", "question_mark", || -> CaseResult {
                let _: i32 = "nope".parse()?;
                Ok(())
            })
            .unwrap();
        registry.register("S", "after", || Ok(())).unwrap();

        let report = Runner::new(&registry).run(&mut NoopObserver);
        assert!(matches!(
            status_of(&report, "panics"),
            CaseStatus::Crashed(m) if m.contains("index out of bounds")
        ));
        assert_eq!(
            status_of(&report, "typed_panic"),
            CaseStatus::Crashed("panicked: non-string panic payload".into())
        );
        assert!(matches!(status_of(&report, "question_mark"), CaseStatus::Crashed(_)));
        assert_eq!(status_of(&report, "after"), CaseStatus::Passed);
        assert_eq!(report.total(), 4);
    }

    #[test]
    fn raised_signals_keep_their_severity() {
        let mut registry = CaseRegistry::new();
        registry
            .register("S", "raised", || -> CaseResult {
                FailureSignal::hard("from a callback").raise()
            })
            .unwrap();

        let report = Runner::new(&registry).run(&mut NoopObserver);
        assert_eq!(
            status_of(&report, "raised"),
            CaseStatus::HardFailed("from a callback".into())
        );
    }

    #[test]
    fn reruns_classify_identically() {
        let mut registry = CaseRegistry::new();
        registry.register("S", "a", || Ok(())).unwrap();
        registry.register("S", "b", || Check::soft().ge(1, 2)).unwrap();
        registry.register("S", "c", || -> CaseResult { panic!("x") }).unwrap();

        let mut runner = Runner::new(&registry);
        let first = runner.run(&mut NoopObserver);
        let second = runner.run(&mut NoopObserver);
        assert!(first.same_classification(&second));
        assert_eq!(first.counts(), second.counts());
    }

    #[test]
    fn observer_sees_every_case() {
        #[derive(Default)]
        struct Recorder {
            states: Vec<RunState>,
            total: usize,
            started: usize,
            finished: Vec<String>,
            done: bool,
        }

        impl Observer for Recorder {
            fn state_changed(&mut self, state: RunState) {
                self.states.push(state);
            }
            fn run_started(&mut self, total: usize) {
                self.total = total;
            }
            fn case_started(&mut self, _case: &TestCase) {
                assert_eq!(self.states.last(), Some(&RunState::Executing));
                self.started += 1;
            }
            fn case_finished(&mut self, outcome: &CaseOutcome) {
                self.finished.push(outcome.id());
            }
            fn run_finished(&mut self, report: &RunReport) {
                self.done = report.total() == self.total;
            }
        }

        let mut registry = CaseRegistry::new();
        registry.register("A", "x", || Ok(())).unwrap();
        registry.register("B", "y", || Ok(())).unwrap();

        let mut recorder = Recorder::default();
        let mut runner = Runner::new(&registry);
        runner.run(&mut recorder);
        runner.run(&mut recorder);
        assert_eq!(
            recorder.states,
            vec![
                RunState::Executing,
                RunState::Completed,
                RunState::Executing,
                RunState::Completed,
            ]
        );

        let mut recorder = Recorder::default();
        Runner::new(&registry).run(&mut recorder);
        assert_eq!(recorder.total, 2);
        assert_eq!(recorder.started, 2);
        assert_eq!(recorder.finished, vec!["A.x", "B.y"]);
        assert!(recorder.done);
    }
}
