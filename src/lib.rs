//! # tripcrew
//!
//! Multi-agent travel-plan orchestration.
//!
//! A set of LLM-backed specialist roles (transport, accommodation, local
//! guide, dining, weather) research a trip, a compiler role assembles their
//! outputs into a single Markdown report with graceful degradation on partial
//! failure, and a separate evaluation pipeline scores finished reports
//! against reference texts with deterministic similarity metrics.

pub mod capabilities;
pub mod cli;
pub mod config;
pub mod coordinator;
pub mod environment;
pub mod eval;
pub mod graph;
pub mod llm;
pub mod planner;
pub mod report;
pub mod roles;
pub mod trip;
pub mod utilities;

pub use coordinator::{TaskResult, TaskStatus};
pub use environment::Environment;
pub use graph::{TaskGraph, TaskState};
pub use planner::{PlanOutcome, TravelPlanner};
pub use roles::RoleId;
pub use trip::{Budget, TripRequest};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
