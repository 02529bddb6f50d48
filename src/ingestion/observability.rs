use std::fmt;
use std::sync::Arc;

use crate::error::ReadError;
use crate::types::ExecutionMode;

use super::unified::FileFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (bad options, malformed data).
    Error,
    /// Critical error (I/O, network and other infrastructure failures).
    Critical,
}

impl ReadSeverity {
    /// Classify a read failure.
    pub fn for_error(e: &ReadError) -> Self {
        match e {
            ReadError::Config { .. } | ReadError::NotImplemented { .. } => Self::Error,
            ReadError::Io(_) | ReadError::Http(_) => Self::Critical,
            ReadError::Polars(polars::prelude::PolarsError::IO { .. }) => Self::Critical,
            ReadError::Polars(_) => Self::Error,
        }
    }
}

/// Context about a read attempt.
#[derive(Debug, Clone)]
pub struct ReadContext {
    /// Human-readable source description (path, URI, or a stream placeholder).
    pub source: String,
    /// Format used for the read.
    pub format: FileFormat,
    /// Eager or lazy.
    pub mode: ExecutionMode,
}

/// Shape of a materialized result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadStats {
    pub rows: usize,
    pub columns: usize,
}

/// Observer interface for read outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait ReadObserver: Send + Sync {
    /// Called when an eager read succeeds.
    fn on_success(&self, _ctx: &ReadContext, _stats: ReadStats) {}

    /// Called when a lazy plan has been built.
    fn on_plan_built(&self, _ctx: &ReadContext) {}

    /// Called when a read or scan fails.
    fn on_failure(&self, _ctx: &ReadContext, _severity: ReadSeverity, _error: &ReadError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &ReadContext, severity: ReadSeverity, error: &ReadError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ReadObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn ReadObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ReadObserver for CompositeObserver {
    fn on_success(&self, ctx: &ReadContext, stats: ReadStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_plan_built(&self, ctx: &ReadContext) {
        for o in &self.observers {
            o.on_plan_built(ctx);
        }
    }

    fn on_failure(&self, ctx: &ReadContext, severity: ReadSeverity, error: &ReadError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &ReadContext, severity: ReadSeverity, error: &ReadError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs read events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl ReadObserver for StdErrObserver {
    fn on_success(&self, ctx: &ReadContext, stats: ReadStats) {
        eprintln!(
            "[read][ok] format={:?} mode={:?} source={} rows={} columns={}",
            ctx.format, ctx.mode, ctx.source, stats.rows, stats.columns
        );
    }

    fn on_plan_built(&self, ctx: &ReadContext) {
        eprintln!("[read][plan] format={:?} source={}", ctx.format, ctx.source);
    }

    fn on_failure(&self, ctx: &ReadContext, severity: ReadSeverity, error: &ReadError) {
        eprintln!(
            "[read][{:?}] format={:?} mode={:?} source={} err={}",
            severity, ctx.format, ctx.mode, ctx.source, error
        );
    }

    fn on_alert(&self, ctx: &ReadContext, severity: ReadSeverity, error: &ReadError) {
        eprintln!(
            "[ALERT][read][{:?}] format={:?} mode={:?} source={} err={}",
            severity, ctx.format, ctx.mode, ctx.source, error
        );
    }
}

/// Emits read events through `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl ReadObserver for TracingObserver {
    fn on_success(&self, ctx: &ReadContext, stats: ReadStats) {
        tracing::info!(
            format = ?ctx.format,
            mode = ?ctx.mode,
            source = %ctx.source,
            rows = stats.rows,
            columns = stats.columns,
            "read succeeded"
        );
    }

    fn on_plan_built(&self, ctx: &ReadContext) {
        tracing::info!(format = ?ctx.format, source = %ctx.source, "scan plan built");
    }

    fn on_failure(&self, ctx: &ReadContext, severity: ReadSeverity, error: &ReadError) {
        tracing::warn!(
            ?severity,
            format = ?ctx.format,
            mode = ?ctx.mode,
            source = %ctx.source,
            %error,
            "read failed"
        );
    }

    fn on_alert(&self, ctx: &ReadContext, severity: ReadSeverity, error: &ReadError) {
        tracing::error!(
            ?severity,
            format = ?ctx.format,
            mode = ?ctx.mode,
            source = %ctx.source,
            %error,
            "read alert"
        );
    }
}
