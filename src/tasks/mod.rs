//! Named compile steps run in a fixed order against a shared [`Context`].
pub mod context;
pub mod debug_mode;
pub mod dependencies;
pub mod icons;
pub mod link;
pub mod templates;

pub use context::Context;

use anyhow::Result;

use crate::error::TaskError;
use crate::logging::TaskStatus;

/// Outcome of a task that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// Task completed successfully.
    Ok,
    /// Task had nothing it could do, with the reason.
    Skipped(String),
}

/// A named, executable task.
pub trait Task: Send + Sync {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Whether this task applies to the current build.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task fails; the build stops there.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The compile pipeline, in execution order.
#[must_use]
pub fn compile_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(debug_mode::EnablePlayerDebugMode),
        Box::new(link::LinkExtension),
        Box::new(dependencies::CopyDependencies),
        Box::new(templates::WriteTemplates),
        Box::new(icons::CopyIcons),
    ]
}

/// Execute a task, recording the result in the logger.
///
/// # Errors
///
/// Returns [`TaskError::ExecutionFailed`] if the task fails.
pub fn execute(task: &dyn Task, ctx: &Context) -> Result<(), TaskError> {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return Ok(());
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
            Ok(())
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
            Ok(())
        }
        Err(e) => {
            let reason = format!("{e:#}");
            ctx.log.error(&format!("{}: {reason}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&reason));
            Err(TaskError::ExecutionFailed {
                task: task.name().to_string(),
                reason,
            })
        }
    }
}

/// Run `tasks` in order, stopping at the first failure.
///
/// # Errors
///
/// Returns the first task failure.
pub fn execute_all(tasks: &[Box<dyn Task>], ctx: &Context) -> Result<(), TaskError> {
    for task in tasks {
        execute(task.as_ref(), ctx)?;
    }
    Ok(())
}
