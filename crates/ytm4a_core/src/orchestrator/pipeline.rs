//! Pipeline runner that executes steps in sequence.

use super::errors::{PipelineError, PipelineResult};
use super::step::PipelineStep;
use super::types::{Context, JobState, StepOutcome};

/// Pipeline that runs a sequence of steps.
///
/// The pipeline executes steps in order, running validation before
/// and after each step, and stops at the first failure.
pub struct Pipeline {
    /// Steps to execute in order.
    steps: Vec<Box<dyn PipelineStep>>,
}

impl Pipeline {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Add a step to the pipeline.
    pub fn add_step<S: PipelineStep + 'static>(&mut self, step: S) -> &mut Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Add a step (builder pattern).
    pub fn with_step<S: PipelineStep + 'static>(mut self, step: S) -> Self {
        self.add_step(step);
        self
    }

    /// Run the pipeline with the given context and state.
    ///
    /// Executes each step in order:
    /// 1. Run `validate_input`
    /// 2. Run `execute`
    /// 3. Run `validate_output` (if execute returned Success)
    ///
    /// Failures are returned, not logged; the caller reports them once.
    pub fn run(&self, ctx: &Context, state: &mut JobState) -> PipelineResult<PipelineRunResult> {
        if !ctx.work_dir.is_dir() {
            return Err(PipelineError::validation_failed(
                &ctx.job_name,
                format!("working directory {} does not exist", ctx.work_dir.display()),
            ));
        }

        let mut result = PipelineRunResult {
            steps_completed: Vec::new(),
            steps_skipped: Vec::new(),
        };

        let total_steps = self.steps.len();
        tracing::info!("Processing {} in {}", ctx.video, ctx.work_dir.display());

        for (i, step) in self.steps.iter().enumerate() {
            let step_name = step.name();
            ctx.logger.phase(step_name);
            ctx.logger.debug(step.description());

            let percent = ((i as f64 / total_steps as f64) * 100.0) as u32;
            ctx.logger.progress(percent);

            ctx.logger.debug(&format!("Validating input for '{}'", step_name));
            step.validate_input(ctx)
                .map_err(|e| PipelineError::step_failed(&ctx.job_name, step_name, e))?;

            ctx.logger.debug(&format!("Executing '{}'", step_name));
            let outcome = step
                .execute(ctx, state)
                .map_err(|e| PipelineError::step_failed(&ctx.job_name, step_name, e))?;

            match outcome {
                StepOutcome::Success => {
                    ctx.logger
                        .debug(&format!("Validating output for '{}'", step_name));
                    step.validate_output(ctx, state)
                        .map_err(|e| PipelineError::step_failed(&ctx.job_name, step_name, e))?;

                    ctx.logger.debug(&format!("{} completed", step_name));
                    result.steps_completed.push(step_name.to_string());
                }
                StepOutcome::Skipped(reason) => {
                    ctx.logger.info(&reason);
                    tracing::debug!("{} skipped: {}", step_name, reason);
                    result.steps_skipped.push(step_name.to_string());
                }
            }
        }

        ctx.logger.progress(100);
        ctx.logger.flush();

        Ok(result)
    }

    /// Get the number of steps in the pipeline.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Get step names in order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineRunResult {
    /// Steps that completed successfully.
    pub steps_completed: Vec<String>,
    /// Steps that were skipped.
    pub steps_skipped: Vec<String>,
}

impl PipelineRunResult {
    /// Check if all steps completed (none skipped).
    pub fn all_completed(&self) -> bool {
        self.steps_skipped.is_empty()
    }

    /// Total number of steps that ran.
    pub fn total_steps(&self) -> usize {
        self.steps_completed.len() + self.steps_skipped.len()
    }
}
