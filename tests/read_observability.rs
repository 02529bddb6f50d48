use std::sync::{Arc, Mutex};

use rust_frame_io::ingestion::{
    read_source, CompositeObserver, FileFormat, ReadContext, ReadCsvOptions, ReadObserver,
    ReadOptions, ReadSeverity, ReadStats, StdErrObserver, TracingObserver,
};
use rust_frame_io::types::ExecutionMode;
use rust_frame_io::ReadError;

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<ReadStats>>,
    plans: Mutex<Vec<FileFormat>>,
    failures: Mutex<Vec<ReadSeverity>>,
    alerts: Mutex<Vec<ReadSeverity>>,
}

impl ReadObserver for RecordingObserver {
    fn on_success(&self, _ctx: &ReadContext, stats: ReadStats) {
        self.successes.lock().unwrap().push(stats);
    }

    fn on_plan_built(&self, ctx: &ReadContext) {
        self.plans.lock().unwrap().push(ctx.format);
    }

    fn on_failure(&self, _ctx: &ReadContext, severity: ReadSeverity, _error: &ReadError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &ReadContext, severity: ReadSeverity, _error: &ReadError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

#[test]
fn observer_receives_stats_on_success() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = ReadOptions {
        observer: Some(obs.clone()),
        ..Default::default()
    };

    read_source("tests/fixtures/people.csv", &opts).unwrap();

    let successes = obs.successes.lock().unwrap().clone();
    assert_eq!(successes, vec![ReadStats { rows: 2, columns: 4 }]);
}

#[test]
fn observer_is_told_about_lazy_plans() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = ReadOptions {
        mode: ExecutionMode::Lazy,
        observer: Some(obs.clone()),
        ..Default::default()
    };

    read_source("tests/fixtures/events.ndjson", &opts).unwrap();

    assert_eq!(obs.plans.lock().unwrap().clone(), vec![FileFormat::Ndjson]);
    assert!(obs.successes.lock().unwrap().is_empty());
}

#[test]
fn observer_receives_failure_and_alert_on_critical_io_error() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = ReadOptions {
        format: Some(FileFormat::Ndjson),
        observer: Some(obs.clone()),
        alert_at_or_above: ReadSeverity::Critical,
        ..Default::default()
    };

    // Missing file -> Io error -> Critical
    let _ = read_source("tests/fixtures/does_not_exist.ndjson", &opts).unwrap_err();

    assert_eq!(obs.failures.lock().unwrap().clone(), vec![ReadSeverity::Critical]);
    assert_eq!(obs.alerts.lock().unwrap().clone(), vec![ReadSeverity::Critical]);
}

#[test]
fn observer_receives_failure_without_alert_for_config_error() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = ReadOptions {
        csv: ReadCsvOptions {
            separator: ";;".to_string(),
            ..Default::default()
        },
        observer: Some(obs.clone()),
        alert_at_or_above: ReadSeverity::Critical,
        ..Default::default()
    };

    let _ = read_source("tests/fixtures/people.csv", &opts).unwrap_err();

    assert_eq!(obs.failures.lock().unwrap().clone(), vec![ReadSeverity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn composite_observer_fans_out() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("rust_frame_io=debug")
        .with_test_writer()
        .try_init();

    let a = Arc::new(RecordingObserver::default());
    let b = Arc::new(RecordingObserver::default());
    let observers: Vec<Arc<dyn ReadObserver>> =
        vec![a.clone(), b.clone(), Arc::new(TracingObserver), Arc::new(StdErrObserver)];
    let composite: Arc<dyn ReadObserver> = Arc::new(CompositeObserver::new(observers));
    let opts = ReadOptions {
        observer: Some(composite.clone()),
        ..Default::default()
    };

    read_source("tests/fixtures/people.json", &opts).unwrap();

    assert_eq!(a.successes.lock().unwrap().len(), 1);
    assert_eq!(b.successes.lock().unwrap().len(), 1);

    let lazy = ReadOptions {
        mode: ExecutionMode::Lazy,
        observer: Some(composite),
        ..Default::default()
    };
    read_source("tests/fixtures/events.ndjson", &lazy).unwrap();

    assert_eq!(a.plans.lock().unwrap().clone(), vec![FileFormat::Ndjson]);
    assert_eq!(b.plans.lock().unwrap().clone(), vec![FileFormat::Ndjson]);
}
