//! Startup task orchestration.
//!
//! Every [`SetupTask`] announces itself as `setup:<name>` on the
//! [`EventBus`]. A [`EventBus::required`] gate waits for `setup:start` plus
//! every task event and then emits `setup:complete`, so listeners can hook
//! startup without knowing which tasks exist.

use crate::config::RouterConfig;
use crate::domain::EventBus;
use crate::error::RouterError;

/// Emitted after every task has been scheduled.
pub const SETUP_START: &str = "setup:start";

/// Emitted once every task and [`SETUP_START`] have fired.
pub const SETUP_COMPLETE: &str = "setup:complete";

/// A single startup step.
pub trait SetupTask: Send + Sync {
    /// Short name; the task's bus event is `setup:<name>`.
    fn name(&self) -> &str;

    /// Runs the step.
    ///
    /// # Errors
    ///
    /// Returns a [`RouterError`] describing why the step failed.
    fn run(&self, config: &RouterConfig) -> Result<(), RouterError>;
}

/// Runs `tasks` in order and emits [`SETUP_COMPLETE`] once all succeed.
///
/// # Errors
///
/// Returns [`RouterError::Setup`] for the first failing task. Remaining
/// tasks are skipped, the gate's listeners are removed, and
/// [`SETUP_COMPLETE`] is never emitted.
pub fn run_setup(
    bus: &EventBus,
    config: &RouterConfig,
    tasks: &[&dyn SetupTask],
) -> Result<(), RouterError> {
    let emitter = bus.clone();
    let gate = bus.required(&[SETUP_START], move || {
        emitter.emit(SETUP_COMPLETE, None);
    });

    let events: Vec<String> = tasks
        .iter()
        .map(|task| format!("setup:{}", task.name()))
        .collect();
    for event in &events {
        gate.add(event);
    }

    for (task, event) in tasks.iter().zip(&events) {
        if let Err(err) = task.run(config) {
            tracing::error!(task = task.name(), kind = err.kind(), error = %err, "setup task failed");
            gate.cancel();
            return Err(RouterError::Setup {
                task: task.name().to_string(),
                reason: err.to_string(),
            });
        }
        tracing::debug!(task = task.name(), "setup task done");
        bus.emit(event, None);
    }

    bus.emit(SETUP_START, None);
    Ok(())
}

/// Creates the configured static directory if it does not exist.
#[derive(Debug, Default)]
pub struct StaticDirTask;

impl SetupTask for StaticDirTask {
    fn name(&self) -> &str {
        "static"
    }

    fn run(&self, config: &RouterConfig) -> Result<(), RouterError> {
        let Some(dir) = config.static_dir.as_ref() else {
            return Ok(());
        };
        std::fs::create_dir_all(dir)?;
        tracing::info!(dir = %dir.display(), "static directory ready");
        Ok(())
    }
}
