//! Task graph construction.
//!
//! The builder turns a [`TripRequest`] into a directed acyclic graph of
//! tasks: one research task per active role with a resolvable identity,
//! one compile task depending on all of them, and optionally one evaluate
//! task depending on the compile task. Roles without an identity are left
//! out of the graph; only a missing compiler is fatal.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use md5::{Digest, Md5};
use thiserror::Error;

use crate::capabilities::CapabilityRegistry;
use crate::config::ConfigStore;
use crate::llm::CompletionBackend;
use crate::roles::{RoleId, CANONICAL_ORDER};
use crate::trip::TripRequest;

/// Lifecycle of a task within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Ready,
    Running,
    Completed,
    Failed,
}

impl TaskState {
    /// Completed or Failed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Failed)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TaskState::Pending => "pending",
            TaskState::Ready => "ready",
            TaskState::Running => "running",
            TaskState::Completed => "completed",
            TaskState::Failed => "failed",
        };
        write!(f, "{label}")
    }
}

/// One node in the task graph.
///
/// Templates stay uninterpolated here; trip parameters are substituted at
/// dispatch time so a rebuilt graph can be rebound to the same request.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: String,
    pub role_id: RoleId,
    pub description_template: String,
    pub expected_output: String,
    /// Names of the capabilities bound to this task at build time.
    pub capabilities: Vec<String>,
    pub dependencies: Vec<String>,
    pub state: TaskState,
}

impl Task {
    /// Content fingerprint of the task templates.
    pub fn key(&self) -> String {
        let mut hasher = Md5::new();
        hasher.update(self.description_template.as_bytes());
        hasher.update(b"|");
        hasher.update(self.expected_output.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn is_research(&self) -> bool {
        self.role_id.is_research()
    }
}

/// The full graph for one run. Consumed by the coordinator.
#[derive(Debug)]
pub struct TaskGraph {
    tasks: Vec<Task>,
    compile_id: String,
    evaluate_id: Option<String>,
}

impl TaskGraph {
    /// All tasks in execution order (research tasks in canonical role
    /// order, then compile, then evaluate if present).
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn research_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.is_research())
    }

    pub fn compile_id(&self) -> &str {
        &self.compile_id
    }

    pub fn evaluate_id(&self) -> Option<&str> {
        self.evaluate_id.as_deref()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphConstructionError {
    #[error("no resolvable identity for compiler role '{role}', cannot build a plan")]
    CompilerUnresolvable { role: RoleId },

    #[error("no task template configured for role '{role}'")]
    MissingTemplate { role: RoleId },
}

/// Builds a [`TaskGraph`] from the active roles of a request.
pub struct GraphBuilder<'a> {
    config: &'a ConfigStore,
    identities: &'a HashMap<RoleId, Arc<dyn CompletionBackend>>,
    registry: &'a CapabilityRegistry,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(
        config: &'a ConfigStore,
        identities: &'a HashMap<RoleId, Arc<dyn CompletionBackend>>,
        registry: &'a CapabilityRegistry,
    ) -> Self {
        Self {
            config,
            identities,
            registry,
        }
    }

    pub fn build(&self, trip: &TripRequest) -> Result<TaskGraph, GraphConstructionError> {
        let active = trip.effective_roles();

        if !self.identities.contains_key(&RoleId::ReportCompiler) {
            return Err(GraphConstructionError::CompilerUnresolvable {
                role: RoleId::ReportCompiler,
            });
        }

        let mut tasks: Vec<Task> = Vec::new();
        let mut research_ids: Vec<String> = Vec::new();

        // Research tasks, canonical order regardless of request order.
        for role in CANONICAL_ORDER {
            if !role.is_research() || !active.contains(&role) {
                continue;
            }
            if !self.identities.contains_key(&role) {
                log::debug!("Role '{}' has no identity, leaving it out of the graph", role);
                continue;
            }
            let Some(template) = self.config.task(role) else {
                log::warn!("Role '{}' has no task template, leaving it out of the graph", role);
                continue;
            };

            let capabilities: Vec<String> = self
                .registry
                .bind_for_role(role)
                .iter()
                .map(|p| p.name().to_string())
                .collect();

            let task = Task {
                id: template.name.clone(),
                role_id: role,
                description_template: template.description_template.clone(),
                expected_output: template.expected_output.clone(),
                capabilities,
                dependencies: Vec::new(),
                state: TaskState::Pending,
            };
            research_ids.push(task.id.clone());
            tasks.push(task);
        }

        let compile_template = self.config.task(RoleId::ReportCompiler).ok_or(
            GraphConstructionError::MissingTemplate {
                role: RoleId::ReportCompiler,
            },
        )?;
        let compile_id = compile_template.name.clone();
        tasks.push(Task {
            id: compile_id.clone(),
            role_id: RoleId::ReportCompiler,
            description_template: compile_template.description_template.clone(),
            expected_output: compile_template.expected_output.clone(),
            capabilities: Vec::new(),
            dependencies: research_ids.clone(),
            state: TaskState::Pending,
        });

        let mut evaluate_id = None;
        if active.contains(&RoleId::ReportEvaluator) {
            if !self.identities.contains_key(&RoleId::ReportEvaluator) {
                log::debug!("Evaluator active but has no identity, skipping evaluation task");
            } else if let Some(template) = self.config.task(RoleId::ReportEvaluator) {
                let capabilities: Vec<String> = self
                    .registry
                    .bind_for_role(RoleId::ReportEvaluator)
                    .iter()
                    .map(|p| p.name().to_string())
                    .collect();
                tasks.push(Task {
                    id: template.name.clone(),
                    role_id: RoleId::ReportEvaluator,
                    description_template: template.description_template.clone(),
                    expected_output: template.expected_output.clone(),
                    capabilities,
                    dependencies: vec![compile_id.clone()],
                    state: TaskState::Pending,
                });
                evaluate_id = Some(template.name.clone());
            } else {
                log::warn!("Evaluator active but has no task template, skipping evaluation task");
            }
        }

        log::info!(
            "Built task graph: {} research task(s), compile{}",
            research_ids.len(),
            if evaluate_id.is_some() { ", evaluate" } else { "" },
        );

        Ok(TaskGraph {
            tasks,
            compile_id,
            evaluate_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedCompletion;

    fn identities_for(roles: &[RoleId]) -> HashMap<RoleId, Arc<dyn CompletionBackend>> {
        roles
            .iter()
            .map(|role| {
                let backend: Arc<dyn CompletionBackend> =
                    Arc::new(ScriptedCompletion::always("output"));
                (*role, backend)
            })
            .collect()
    }

    fn all_roles() -> Vec<RoleId> {
        CANONICAL_ORDER.to_vec()
    }

    fn sample_trip() -> TripRequest {
        TripRequest::new(
            "New York, USA",
            "Paris, France",
            chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2025, 6, 8).unwrap(),
        )
    }

    #[test]
    fn test_full_graph_layout() {
        let config = ConfigStore::builtin();
        let identities = identities_for(&all_roles());
        let registry = CapabilityRegistry::with_builtin();
        let builder = GraphBuilder::new(&config, &identities, &registry);

        let graph = builder.build(&sample_trip()).unwrap();

        // Default active roles: 5 research + compiler, no evaluator.
        assert_eq!(graph.len(), 6);
        assert_eq!(graph.compile_id(), "compile_travel_report");
        assert!(graph.evaluate_id().is_none());

        let compile = graph.task("compile_travel_report").unwrap();
        assert_eq!(compile.dependencies.len(), 5);
        assert_eq!(compile.state, TaskState::Pending);
    }

    #[test]
    fn test_research_tasks_in_canonical_order() {
        let config = ConfigStore::builtin();
        let identities = identities_for(&all_roles());
        let registry = CapabilityRegistry::new();
        let builder = GraphBuilder::new(&config, &identities, &registry);

        // Request order is scrambled; graph order must not be.
        let trip = sample_trip().with_active_roles(vec![
            RoleId::WeatherAdvisor,
            RoleId::TransportPlanner,
            RoleId::DiningExpert,
        ]);
        let graph = builder.build(&trip).unwrap();

        let ids: Vec<&str> = graph.research_tasks().map(|t| t.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "find_transportation",
                "get_dining_recommendations",
                "get_weather_and_packing_advice",
            ]
        );
    }

    #[test]
    fn test_unresolvable_role_absent() {
        let config = ConfigStore::builtin();
        let identities = identities_for(&[RoleId::TransportPlanner, RoleId::ReportCompiler]);
        let registry = CapabilityRegistry::new();
        let builder = GraphBuilder::new(&config, &identities, &registry);

        let graph = builder.build(&sample_trip()).unwrap();

        assert_eq!(graph.research_tasks().count(), 1);
        let compile = graph.task(graph.compile_id()).unwrap();
        assert_eq!(compile.dependencies, vec!["find_transportation".to_string()]);
    }

    #[test]
    fn test_missing_compiler_is_fatal() {
        let config = ConfigStore::builtin();
        let identities = identities_for(&[RoleId::TransportPlanner]);
        let registry = CapabilityRegistry::new();
        let builder = GraphBuilder::new(&config, &identities, &registry);

        let err = builder.build(&sample_trip()).unwrap_err();
        assert!(matches!(
            err,
            GraphConstructionError::CompilerUnresolvable { .. }
        ));
    }

    #[test]
    fn test_compiler_only_graph_is_valid() {
        let config = ConfigStore::builtin();
        let identities = identities_for(&[RoleId::ReportCompiler]);
        let registry = CapabilityRegistry::new();
        let builder = GraphBuilder::new(&config, &identities, &registry);

        let graph = builder.build(&sample_trip()).unwrap();
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.research_tasks().count(), 0);
        let compile = graph.task(graph.compile_id()).unwrap();
        assert!(compile.dependencies.is_empty());
    }

    #[test]
    fn test_evaluator_task_when_resolvable() {
        let config = ConfigStore::builtin();
        let identities = identities_for(&all_roles());
        let registry = CapabilityRegistry::new();
        let builder = GraphBuilder::new(&config, &identities, &registry);

        let mut roles = RoleId::default_active();
        roles.push(RoleId::ReportEvaluator);
        let trip = sample_trip().with_active_roles(roles);

        let graph = builder.build(&trip).unwrap();
        assert_eq!(graph.evaluate_id(), Some("evaluate_report"));
        let evaluate = graph.task("evaluate_report").unwrap();
        assert_eq!(evaluate.dependencies, vec!["compile_travel_report".to_string()]);
    }

    #[test]
    fn test_evaluator_without_identity_skipped() {
        let config = ConfigStore::builtin();
        let mut roles = RoleId::default_active();
        roles.push(RoleId::ReportEvaluator);
        let identities = identities_for(&RoleId::default_active());
        let registry = CapabilityRegistry::new();
        let builder = GraphBuilder::new(&config, &identities, &registry);

        let trip = sample_trip().with_active_roles(roles);
        let graph = builder.build(&trip).unwrap();
        assert!(graph.evaluate_id().is_none());
    }

    #[test]
    fn test_capabilities_bound_at_build() {
        let config = ConfigStore::builtin();
        let identities = identities_for(&all_roles());
        let registry = CapabilityRegistry::with_builtin();
        let builder = GraphBuilder::new(&config, &identities, &registry);

        let graph = builder.build(&sample_trip()).unwrap();
        let weather = graph.task("get_weather_and_packing_advice").unwrap();
        assert_eq!(weather.capabilities, vec!["clothing_recommendation".to_string()]);

        let transport = graph.task("find_transportation").unwrap();
        assert!(transport.capabilities.is_empty());
    }

    #[test]
    fn test_task_key_stable() {
        let config = ConfigStore::builtin();
        let identities = identities_for(&all_roles());
        let registry = CapabilityRegistry::new();
        let builder = GraphBuilder::new(&config, &identities, &registry);

        let graph_a = builder.build(&sample_trip()).unwrap();
        let graph_b = builder.build(&sample_trip()).unwrap();
        let key_a = graph_a.task("find_transportation").unwrap().key();
        let key_b = graph_b.task("find_transportation").unwrap().key();

        assert_eq!(key_a, key_b);
        assert_eq!(key_a.len(), 32);
    }
}
