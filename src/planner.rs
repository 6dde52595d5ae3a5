//! High-level planning facade.
//!
//! Wires the configuration store, capability registry, and resolved role
//! identities into a coordinator run, and owns report persistence: the
//! compile step composes the document and writes it, degrading to the
//! emergency path on write failure. This is the API both the CLI and
//! library consumers drive.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use crate::capabilities::CapabilityRegistry;
use crate::config::ConfigStore;
use crate::coordinator::{CompileFn, Coordinator, TaskResult, TaskStatus, DEFAULT_TASK_TIMEOUT_SECS};
use crate::environment::Environment;
use crate::graph::{GraphBuilder, GraphConstructionError};
use crate::llm::{resolve_identities, CompletionBackend};
use crate::report::{self, ReportWriter, DEFAULT_REPORTS_DIR};
use crate::roles::RoleId;
use crate::trip::{TripError, TripRequest};

/// Default directory role and task template overrides are loaded from.
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Fatal planning failures. Everything task-level is captured in the
/// per-task results instead.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    InvalidTrip(#[from] TripError),

    #[error(transparent)]
    Graph(#[from] GraphConstructionError),

    #[error("no report could be written: {0}")]
    ReportUnwritable(String),

    #[error("synchronous plan invoked inside an async runtime, use plan_async instead")]
    NestedRuntime,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Everything a completed planning run hands back.
#[derive(Debug)]
pub struct PlanOutcome {
    pub run_id: Uuid,
    pub report_path: PathBuf,
    pub report_content: String,
    pub results: BTreeMap<String, TaskResult>,
}

/// Orchestrates a full planning run for one [`TripRequest`].
pub struct TravelPlanner {
    config: ConfigStore,
    registry: CapabilityRegistry,
    identities: HashMap<RoleId, Arc<dyn CompletionBackend>>,
    reports_dir: PathBuf,
    task_timeout: Duration,
}

impl TravelPlanner {
    pub fn new(
        config: ConfigStore,
        registry: CapabilityRegistry,
        identities: HashMap<RoleId, Arc<dyn CompletionBackend>>,
    ) -> Self {
        Self {
            config,
            registry,
            identities,
            reports_dir: PathBuf::from(DEFAULT_REPORTS_DIR),
            task_timeout: Duration::from_secs(DEFAULT_TASK_TIMEOUT_SECS),
        }
    }

    /// Assemble a planner from process configuration: template overrides
    /// from the config directory, built-in capabilities, and one identity
    /// per role the environment holds an API key for.
    pub fn from_environment(env: &Environment) -> Self {
        let config = ConfigStore::load_or_default(DEFAULT_CONFIG_DIR);
        let registry = CapabilityRegistry::with_builtin();
        let identities = resolve_identities(env);
        Self::new(config, registry, identities)
    }

    pub fn with_reports_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.reports_dir = dir.into();
        self
    }

    pub fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout = timeout;
        self
    }

    /// Synchronous wrapper around [`TravelPlanner::plan_async`].
    ///
    /// Spins up a runtime, so it must not be called from async context.
    pub fn plan(&self, trip: &TripRequest) -> Result<PlanOutcome, PlanError> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(PlanError::NestedRuntime);
        }
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.plan_async(trip))
    }

    /// Run the full pipeline: validate, build the graph, execute it, and
    /// persist the report.
    pub async fn plan_async(&self, trip: &TripRequest) -> Result<PlanOutcome, PlanError> {
        trip.validate()?;
        let run_id = Uuid::new_v4();
        log::info!(
            "Planning run {} for {} -> {} ({} to {})",
            run_id,
            trip.starting_point,
            trip.destination,
            trip.start_date,
            trip.end_date
        );

        let graph = GraphBuilder::new(&self.config, &self.identities, &self.registry).build(trip)?;
        let compile_id = graph.compile_id().to_string();

        let writer = ReportWriter::new(&self.reports_dir);
        let written: Arc<Mutex<Option<PathBuf>>> = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&written);
        let compile_fn: CompileFn<'_> = Box::new(move |trip, results| {
            let content = report::compose(trip, results);
            match writer.write_report(&trip.destination, &content) {
                Ok(path) => {
                    store_path(&slot, path);
                    Ok(content)
                }
                Err(err) => {
                    log::warn!(
                        "Report write failed ({}), falling back to an emergency report",
                        err
                    );
                    let emergency = report::fallback_report(trip);
                    match writer.write_emergency(&emergency) {
                        Ok(path) => {
                            store_path(&slot, path);
                            Ok(emergency)
                        }
                        Err(second) => Err(format!(
                            "report write failed ({}); emergency write failed ({})",
                            err, second
                        )),
                    }
                }
            }
        });

        let coordinator =
            Coordinator::new(&self.config, &self.identities, &self.registry, compile_fn)
                .with_task_timeout(self.task_timeout);
        let results = coordinator.run_async(trip, graph).await;

        let report_path = match take_path(&written) {
            Some(path) => path,
            None => {
                let message = results
                    .get(&compile_id)
                    .and_then(|result| match &result.status {
                        TaskStatus::Error(message) => Some(message.clone()),
                        _ => None,
                    })
                    .unwrap_or_else(|| "report was not persisted".to_string());
                return Err(PlanError::ReportUnwritable(message));
            }
        };
        let report_content = results
            .get(&compile_id)
            .map(|result| result.raw_text.clone())
            .unwrap_or_default();

        log::info!(
            "Planning run {} finished, report at {}",
            run_id,
            report_path.display()
        );
        Ok(PlanOutcome {
            run_id,
            report_path,
            report_content,
            results,
        })
    }
}

fn store_path(slot: &Mutex<Option<PathBuf>>, path: PathBuf) {
    let mut guard = slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = Some(path);
}

fn take_path(slot: &Mutex<Option<PathBuf>>) -> Option<PathBuf> {
    slot.lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .take()
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;

    use crate::llm::ScriptedCompletion;

    fn trip() -> TripRequest {
        TripRequest::new(
            "New York, USA",
            "Paris, France",
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 8).unwrap(),
        )
    }

    fn scripted(response: &str) -> Arc<dyn CompletionBackend> {
        Arc::new(ScriptedCompletion::always(response))
    }

    fn planner_with(
        identities: Vec<(RoleId, Arc<dyn CompletionBackend>)>,
        reports_dir: &std::path::Path,
    ) -> TravelPlanner {
        TravelPlanner::new(
            ConfigStore::builtin(),
            CapabilityRegistry::new(),
            identities.into_iter().collect(),
        )
        .with_reports_dir(reports_dir)
    }

    #[tokio::test]
    async fn transport_only_plan_writes_the_scenario_report() {
        let dir = tempfile::tempdir().unwrap();
        let planner = planner_with(
            vec![
                (RoleId::TransportPlanner, scripted("Flight options: ...")),
                (RoleId::ReportCompiler, scripted("unused")),
            ],
            dir.path(),
        );
        let trip = trip().with_active_roles(vec![RoleId::TransportPlanner]);

        let outcome = planner.plan_async(&trip).await.unwrap();

        assert!(outcome.report_path.exists());
        let on_disk = std::fs::read_to_string(&outcome.report_path).unwrap();
        assert_eq!(on_disk, outcome.report_content);
        assert!(on_disk.contains("## Transportation"));
        assert!(on_disk.contains("Flight options: ..."));
        assert!(on_disk.contains(
            "The following sections are missing: Accommodation, Destination Guide, Dining, Weather & Packing.*"
        ));
        assert!(outcome.results.contains_key("find_transportation"));
        assert!(outcome.results.contains_key("compile_travel_report"));
    }

    #[tokio::test]
    async fn compiler_only_plan_falls_back_to_the_template_report() {
        let dir = tempfile::tempdir().unwrap();
        let planner = planner_with(vec![(RoleId::ReportCompiler, scripted("unused"))], dir.path());
        let trip = trip().with_active_roles(vec![]);

        let outcome = planner.plan_async(&trip).await.unwrap();

        assert!(outcome.report_content.contains("This is a basic travel plan"));
        assert!(!outcome.report_content.contains("## Transportation"));
        let name = outcome
            .report_path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        assert!(name.starts_with("travel_plan_Paris__France_"));
    }

    #[tokio::test]
    async fn invalid_trip_is_rejected_before_any_work() {
        let dir = tempfile::tempdir().unwrap();
        let planner = planner_with(vec![(RoleId::ReportCompiler, scripted("unused"))], dir.path());
        let bad = trip().with_travelers(0);

        let err = planner.plan_async(&bad).await.unwrap_err();
        assert!(matches!(err, PlanError::InvalidTrip(_)));
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn missing_compiler_identity_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let planner = planner_with(
            vec![(RoleId::TransportPlanner, scripted("Flight options"))],
            dir.path(),
        );

        let err = planner.plan_async(&trip()).await.unwrap_err();
        assert!(matches!(
            err,
            PlanError::Graph(GraphConstructionError::CompilerUnresolvable { .. })
        ));
    }

    #[tokio::test]
    async fn unwritable_reports_dir_surfaces_report_unwritable() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("reports");
        std::fs::write(&blocker, "not a directory").unwrap();
        let planner = planner_with(vec![(RoleId::ReportCompiler, scripted("unused"))], &blocker);

        let err = planner.plan_async(&trip()).await.unwrap_err();
        match err {
            PlanError::ReportUnwritable(message) => {
                assert!(message.contains("emergency write failed"));
            }
            other => panic!("expected ReportUnwritable, got {:?}", other),
        }
    }

    #[test]
    fn sync_plan_rejects_nested_runtimes() {
        tokio_test::block_on(async {
            let dir = tempfile::tempdir().unwrap();
            let planner =
                planner_with(vec![(RoleId::ReportCompiler, scripted("unused"))], dir.path());
            let err = planner.plan(&trip()).unwrap_err();
            assert!(matches!(err, PlanError::NestedRuntime));
        });
    }

    #[test]
    fn from_environment_without_keys_cannot_build_a_graph() {
        let planner = TravelPlanner::from_environment(&Environment::empty());
        let err = planner.plan(&trip()).unwrap_err();
        assert!(matches!(
            err,
            PlanError::Graph(GraphConstructionError::CompilerUnresolvable { .. })
        ));
    }
}
