//! Sequential task execution.
//!
//! The coordinator walks a [`TaskGraph`] in order: research tasks first,
//! then the compile task, then the optional evaluate task. Templates are
//! interpolated with trip parameters at dispatch time, each dispatch runs
//! under a timeout, and failures are captured as task results rather than
//! aborting the run. A run always produces one result per task.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::capabilities::CapabilityRegistry;
use crate::config::ConfigStore;
use crate::graph::{Task, TaskGraph, TaskState};
use crate::llm::{CompletionBackend, LLMMessage, LlmError};
use crate::roles::RoleId;
use crate::trip::TripRequest;
use crate::utilities::string_utils::{brief_summary, interpolate_only, InterpolationError};

/// Default wall-clock limit for a single task dispatch.
pub const DEFAULT_TASK_TIMEOUT_SECS: u64 = 120;

/// Outcome classification of a finished task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    /// The task produced usable text.
    Ok,
    /// The task finished but returned nothing after trimming.
    EmptyOutput,
    /// The task failed; the message describes the failure.
    Error(String),
}

/// What one task produced during a run.
#[derive(Debug, Clone)]
pub struct TaskResult {
    pub task_id: String,
    pub role_id: RoleId,
    pub raw_text: String,
    pub status: TaskStatus,
}

impl TaskResult {
    /// Result for a task that ran to completion.
    pub fn completed(task_id: impl Into<String>, role_id: RoleId, raw_text: String) -> Self {
        let status = if raw_text.trim().is_empty() {
            TaskStatus::EmptyOutput
        } else {
            TaskStatus::Ok
        };
        Self {
            task_id: task_id.into(),
            role_id,
            raw_text,
            status,
        }
    }

    /// Result for a task that failed with `message`.
    pub fn error(task_id: impl Into<String>, role_id: RoleId, message: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            role_id,
            raw_text: String::new(),
            status: TaskStatus::Error(message.into()),
        }
    }

    /// First words of the output, for one-line log summaries.
    pub fn brief(&self) -> String {
        brief_summary(&self.raw_text)
    }

    /// Whether the task ran to completion, even with empty output.
    pub fn is_usable(&self) -> bool {
        matches!(self.status, TaskStatus::Ok | TaskStatus::EmptyOutput)
    }
}

/// Errors raised while dispatching a single task, or while entering the
/// runtime for a synchronous run.
#[derive(Debug, Error)]
pub enum TaskExecutionError {
    #[error("timeout")]
    Timeout,

    #[error("no identity resolved for role '{0}'")]
    MissingIdentity(RoleId),

    #[error(transparent)]
    Interpolation(#[from] InterpolationError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("{0}")]
    Execution(String),

    #[error("synchronous run invoked inside an async runtime, use run_async instead")]
    NestedRuntime,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Synchronous aggregation step invoked once the research tasks settle.
///
/// Receives every research result, including failed ones, in execution
/// order. An `Err` message becomes the compile task's error status.
pub type CompileFn<'a> =
    Box<dyn Fn(&TripRequest, &[TaskResult]) -> Result<String, String> + Send + Sync + 'a>;

/// Drives a [`TaskGraph`] to completion.
pub struct Coordinator<'a> {
    config: &'a ConfigStore,
    identities: &'a HashMap<RoleId, Arc<dyn CompletionBackend>>,
    registry: &'a CapabilityRegistry,
    compile_fn: CompileFn<'a>,
    task_timeout: Duration,
}

impl<'a> Coordinator<'a> {
    pub fn new(
        config: &'a ConfigStore,
        identities: &'a HashMap<RoleId, Arc<dyn CompletionBackend>>,
        registry: &'a CapabilityRegistry,
        compile_fn: CompileFn<'a>,
    ) -> Self {
        Self {
            config,
            identities,
            registry,
            compile_fn,
            task_timeout: Duration::from_secs(DEFAULT_TASK_TIMEOUT_SECS),
        }
    }

    pub fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout = timeout;
        self
    }

    /// Synchronous wrapper around [`Coordinator::run_async`].
    ///
    /// Spins up a runtime, so it must not be called from async context.
    pub fn run(
        &self,
        trip: &TripRequest,
        graph: TaskGraph,
    ) -> Result<BTreeMap<String, TaskResult>, TaskExecutionError> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(TaskExecutionError::NestedRuntime);
        }
        let rt = tokio::runtime::Runtime::new()?;
        Ok(rt.block_on(self.run_async(trip, graph)))
    }

    /// Execute every task in the graph, sequentially.
    ///
    /// The run itself never fails; per-task failures are captured in the
    /// returned results, keyed by task id.
    pub async fn run_async(
        &self,
        trip: &TripRequest,
        mut graph: TaskGraph,
    ) -> BTreeMap<String, TaskResult> {
        let params = trip.params();
        let mut results: BTreeMap<String, TaskResult> = BTreeMap::new();
        let mut research_results: Vec<TaskResult> = Vec::new();

        let research: Vec<Task> = graph.research_tasks().cloned().collect();
        for task in research {
            Self::transition(&mut graph, &task.id, TaskState::Ready);
            Self::transition(&mut graph, &task.id, TaskState::Running);
            log::info!(
                "Dispatching task '{}' [{}] to role '{}'",
                task.id,
                &task.key()[..8],
                task.role_id
            );

            let outcome = tokio::time::timeout(
                self.task_timeout,
                self.execute_task(trip, &params, &task, None),
            )
            .await;
            let result = match outcome {
                Ok(Ok(text)) => {
                    let result = TaskResult::completed(&task.id, task.role_id, text);
                    log::info!("Task '{}' completed: {}", task.id, result.brief());
                    Self::transition(&mut graph, &task.id, TaskState::Completed);
                    result
                }
                Ok(Err(err)) => {
                    log::warn!("Task '{}' failed: {}", task.id, err);
                    Self::transition(&mut graph, &task.id, TaskState::Failed);
                    TaskResult::error(&task.id, task.role_id, err.to_string())
                }
                Err(_) => {
                    log::warn!(
                        "Task '{}' timed out after {:?}",
                        task.id,
                        self.task_timeout
                    );
                    Self::transition(&mut graph, &task.id, TaskState::Failed);
                    TaskResult::error(
                        &task.id,
                        task.role_id,
                        TaskExecutionError::Timeout.to_string(),
                    )
                }
            };
            research_results.push(result.clone());
            results.insert(task.id.clone(), result);
        }

        // Compile runs even when research tasks failed; the aggregation
        // step decides what to do with partial results.
        let compile_id = graph.compile_id().to_string();
        Self::transition(&mut graph, &compile_id, TaskState::Ready);
        Self::transition(&mut graph, &compile_id, TaskState::Running);
        log::info!("Dispatching compile task '{}'", compile_id);
        let compile_result = match (self.compile_fn)(trip, &research_results) {
            Ok(text) => {
                let result = TaskResult::completed(&compile_id, RoleId::ReportCompiler, text);
                log::info!("Task '{}' completed: {}", compile_id, result.brief());
                Self::transition(&mut graph, &compile_id, TaskState::Completed);
                result
            }
            Err(message) => {
                log::warn!("Task '{}' failed: {}", compile_id, message);
                Self::transition(&mut graph, &compile_id, TaskState::Failed);
                TaskResult::error(&compile_id, RoleId::ReportCompiler, message)
            }
        };
        let compile_text = compile_result.raw_text.clone();
        results.insert(compile_id.clone(), compile_result);

        if let Some(evaluate_id) = graph.evaluate_id().map(str::to_string) {
            let Some(task) = graph.task(&evaluate_id).cloned() else {
                return results;
            };
            Self::transition(&mut graph, &evaluate_id, TaskState::Ready);
            Self::transition(&mut graph, &evaluate_id, TaskState::Running);
            log::info!("Dispatching evaluate task '{}'", evaluate_id);

            let context = if compile_text.trim().is_empty() {
                None
            } else {
                Some(compile_text.as_str())
            };
            let outcome = tokio::time::timeout(
                self.task_timeout,
                self.execute_task(trip, &params, &task, context),
            )
            .await;
            let result = match outcome {
                Ok(Ok(text)) => {
                    let result = TaskResult::completed(&evaluate_id, task.role_id, text);
                    log::info!("Task '{}' completed: {}", evaluate_id, result.brief());
                    Self::transition(&mut graph, &evaluate_id, TaskState::Completed);
                    result
                }
                Ok(Err(err)) => {
                    log::warn!("Task '{}' failed: {}", evaluate_id, err);
                    Self::transition(&mut graph, &evaluate_id, TaskState::Failed);
                    TaskResult::error(&evaluate_id, task.role_id, err.to_string())
                }
                Err(_) => {
                    log::warn!(
                        "Task '{}' timed out after {:?}",
                        evaluate_id,
                        self.task_timeout
                    );
                    Self::transition(&mut graph, &evaluate_id, TaskState::Failed);
                    TaskResult::error(
                        &evaluate_id,
                        task.role_id,
                        TaskExecutionError::Timeout.to_string(),
                    )
                }
            };
            results.insert(evaluate_id, result);
        }

        results
    }

    fn transition(graph: &mut TaskGraph, id: &str, state: TaskState) {
        if let Some(task) = graph.task_mut(id) {
            task.state = state;
        }
    }

    /// Interpolate the task templates and dispatch to the role's backend.
    async fn execute_task(
        &self,
        trip: &TripRequest,
        params: &HashMap<String, String>,
        task: &Task,
        context: Option<&str>,
    ) -> Result<String, TaskExecutionError> {
        let backend = self
            .identities
            .get(&task.role_id)
            .ok_or(TaskExecutionError::MissingIdentity(task.role_id))?;
        let definition = self.config.role(task.role_id).ok_or_else(|| {
            TaskExecutionError::Execution(format!(
                "no role definition configured for '{}'",
                task.role_id
            ))
        })?;

        let goal = interpolate_only(Some(&definition.goal_template), params)?;
        let backstory = interpolate_only(Some(&definition.backstory_template), params)?;
        let system = format!("You are {}.\n\n{}\n\n{}", definition.title, goal, backstory);

        let description = interpolate_only(Some(&task.description_template), params)?;
        let expected = interpolate_only(Some(&task.expected_output), params)?;
        let mut user = description;
        if !expected.trim().is_empty() {
            user.push_str("\n\nExpected Output: ");
            user.push_str(&expected);
        }
        if let Some(context) = context {
            user.push_str("\n\nContext:\n");
            user.push_str(context);
        }
        if task.is_research() {
            if let Some(notes) = self.gather_capability_notes(trip, task).await {
                user.push_str("\n\nResearch notes from available data sources:\n\n");
                user.push_str(&notes);
            }
        }

        let messages = [LLMMessage::system(system), LLMMessage::user(user)];
        Ok(backend.acall(&messages).await?)
    }

    /// Invoke the task's bound capabilities and collect their output.
    ///
    /// Capability failures are logged and skipped; the task still runs on
    /// the backend alone.
    async fn gather_capability_notes(&self, trip: &TripRequest, task: &Task) -> Option<String> {
        let mut notes: Vec<String> = Vec::new();
        for name in &task.capabilities {
            let Some(provider) = self.registry.get(name) else {
                log::debug!("Capability '{}' no longer available, skipping", name);
                continue;
            };
            let params = trip.capability_params(task.role_id);
            match provider.call(&params).await {
                Ok(text) if text.trim().is_empty() => {
                    log::debug!("Capability '{}' returned no data", name);
                }
                Ok(text) => notes.push(format!("[{}]\n{}", name, text)),
                Err(err) => {
                    log::warn!("Capability '{}' failed: {}", name, err);
                }
            }
        }
        if notes.is_empty() {
            None
        } else {
            Some(notes.join("\n\n---\n\n"))
        }
    }
}
