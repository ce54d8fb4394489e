//! Metrics sink boundary.
//!
//! Evaluation logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
//!
//! This module is the only allowed bridge between evaluation
//! and the thread-local metrics state.
use crate::{error::UnsupportedFeature, obs::metrics, predicate::CompoundPredicateType};
use std::cell::RefCell;

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn MetricsSink>> = RefCell::new(None);
}

///
/// NodeKind
///
/// Which branch of the evaluator handled one node.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NodeKind {
    Constant,
    Test,
    /// Test predicate visited without a target; the test function is skipped.
    AbsentTarget,
    Compound(CompoundPredicateType),
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    Evaluate { kind: NodeKind },
    Unsupported { feature: UnsupportedFeature },
    ContractViolation,
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::Evaluate { kind } => metrics::with_state_mut(|m| {
                m.ops.evaluations = m.ops.evaluations.saturating_add(1);
                match kind {
                    NodeKind::Constant => {
                        m.ops.constant_evals = m.ops.constant_evals.saturating_add(1);
                    }
                    NodeKind::Test => m.ops.test_evals = m.ops.test_evals.saturating_add(1),
                    NodeKind::AbsentTarget => {
                        m.ops.absent_target_evals = m.ops.absent_target_evals.saturating_add(1);
                    }
                    NodeKind::Compound(CompoundPredicateType::And) => {
                        m.ops.and_evals = m.ops.and_evals.saturating_add(1);
                    }
                    NodeKind::Compound(CompoundPredicateType::Or) => {
                        m.ops.or_evals = m.ops.or_evals.saturating_add(1);
                    }
                    NodeKind::Compound(CompoundPredicateType::Not) => {
                        m.ops.not_evals = m.ops.not_evals.saturating_add(1);
                    }
                }
            }),
            MetricsEvent::Unsupported { feature } => metrics::with_state_mut(|m| {
                m.ops.unsupported_signals = m.ops.unsupported_signals.saturating_add(1);
                let label = feature.label().to_string();
                let entry = m.unsupported.entry(label).or_default();
                *entry = entry.saturating_add(1);
            }),
            MetricsEvent::ContractViolation => metrics::with_state_mut(|m| {
                m.ops.contract_violations = m.ops.contract_violations.saturating_add(1);
            }),
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // Preconditions:
        // - `ptr` was produced from a valid `&dyn MetricsSink` in `with_metrics_sink`.
        // - `with_metrics_sink` always restores the previous pointer before returning,
        //   including unwind paths via `Guard::drop`.
        // - `record` is synchronous and never stores `ptr` beyond this call.
        //
        // Aliasing:
        // - Only a shared reference is materialized, matching the shared borrow
        //   used to install the override.
        unsafe { (&*ptr).record(event) };
    } else {
        GLOBAL_METRICS_SINK.record(event);
    }
}

/// Snapshot the current thread's metrics state.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics state for the current thread.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
///
/// The override is scoped to the current thread and to the dynamic extent of
/// `f`; the previous sink is restored even if `f` panics.
pub fn with_metrics_sink<T>(sink: &dyn MetricsSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn MetricsSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY:
    // - `sink_ptr` is installed only for this dynamic scope.
    // - `Guard` restores the previous slot on all exits, including panic.
    // - `record` only dereferences synchronously and never persists `sink_ptr`.
    let sink_ptr = unsafe { std::mem::transmute::<&dyn MetricsSink, *const dyn MetricsSink>(sink) };

    let prev = SINK_OVERRIDE.with(|cell| {
        let mut slot = cell.borrow_mut();
        slot.replace(sink_ptr)
    });
    let _guard = Guard(prev);

    f()
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CaptureSink {
        events: RefCell<Vec<MetricsEvent>>,
    }

    impl MetricsSink for CaptureSink {
        fn record(&self, event: MetricsEvent) {
            self.events.borrow_mut().push(event);
        }
    }

    #[test]
    fn global_sink_counts_by_node_kind() {
        metrics_reset_all();

        record(MetricsEvent::Evaluate {
            kind: NodeKind::Constant,
        });
        record(MetricsEvent::Evaluate {
            kind: NodeKind::Compound(CompoundPredicateType::Or),
        });
        record(MetricsEvent::Evaluate {
            kind: NodeKind::AbsentTarget,
        });

        let report = metrics_report();
        assert_eq!(report.ops.evaluations, 3);
        assert_eq!(report.ops.constant_evals, 1);
        assert_eq!(report.ops.or_evals, 1);
        assert_eq!(report.ops.absent_target_evals, 1);
        assert_eq!(report.ops.test_evals, 0);
    }

    #[test]
    fn unsupported_events_are_keyed_by_label() {
        metrics_reset_all();

        record(MetricsEvent::Unsupported {
            feature: UnsupportedFeature::FormatString,
        });
        record(MetricsEvent::Unsupported {
            feature: UnsupportedFeature::FormatString,
        });

        let report = metrics_report();
        assert_eq!(report.ops.unsupported_signals, 2);
        assert_eq!(report.unsupported.get("format_string"), Some(&2));
    }

    #[test]
    fn override_captures_events_and_restores_global_sink() {
        metrics_reset_all();
        let capture = CaptureSink::default();

        with_metrics_sink(&capture, || record(MetricsEvent::ContractViolation));
        record(MetricsEvent::ContractViolation);

        assert_eq!(
            capture.events.borrow().as_slice(),
            &[MetricsEvent::ContractViolation]
        );
        assert_eq!(metrics_report().ops.contract_violations, 1);
    }

    #[test]
    fn override_is_restored_after_panic() {
        metrics_reset_all();
        let capture = CaptureSink::default();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            with_metrics_sink::<()>(&capture, || panic!("boom"));
        }));
        assert!(result.is_err());

        record(MetricsEvent::ContractViolation);
        assert!(capture.events.borrow().is_empty());
        assert_eq!(metrics_report().ops.contract_violations, 1);
    }

    #[test]
    fn report_serializes_to_json() {
        metrics_reset_all();
        record(MetricsEvent::Evaluate {
            kind: NodeKind::Test,
        });

        let json = serde_json::to_value(metrics_report()).expect("serialize report");
        assert_eq!(json["ops"]["test_evals"], 1);
    }
}
