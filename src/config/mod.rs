//! Role and task template configuration.
//!
//! Templates ship as built-in defaults and can be overridden per entry by
//! YAML files in a config directory:
//!
//! ```yaml
//! # config/roles.yaml
//! transport_planner:
//!   role: Transport & Flight Planner
//!   goal: Find the best route from {starting_point} to {destination}
//!   backstory: You are a logistics expert.
//! ```
//!
//! ```yaml
//! # config/tasks.yaml
//! find_transportation:
//!   description: Research transport between {starting_point} and {destination}.
//!   expected_output: A transportation section.
//! ```
//!
//! Loading never fails: a missing or malformed file keeps the built-in
//! defaults, an unknown role or task key is skipped with a warning.

mod defaults;

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::roles::RoleId;

/// A role's persona: title plus goal and backstory templates.
#[derive(Debug, Clone)]
pub struct RoleDefinition {
    pub role_id: RoleId,
    pub title: String,
    pub goal_template: String,
    pub backstory_template: String,
}

/// A task template bound to a role.
#[derive(Debug, Clone)]
pub struct TaskTemplate {
    pub name: String,
    pub role_id: RoleId,
    pub description_template: String,
    pub expected_output: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Raw role entry as it appears in roles.yaml.
#[derive(Debug, Deserialize)]
struct RawRoleConfig {
    role: Option<String>,
    goal: Option<String>,
    backstory: Option<String>,
}

/// Raw task entry as it appears in tasks.yaml.
#[derive(Debug, Deserialize)]
struct RawTaskConfig {
    description: Option<String>,
    expected_output: Option<String>,
    #[serde(alias = "agent_assigned")]
    agent: Option<String>,
}

/// Fixed binding from task name to the role that runs it. Overridable per
/// entry via the `agent` key in tasks.yaml.
fn task_role(name: &str) -> Option<RoleId> {
    match name {
        "find_transportation" => Some(RoleId::TransportPlanner),
        "find_accommodation" => Some(RoleId::AccommodationFinder),
        "get_local_context" => Some(RoleId::LocalGuide),
        "get_dining_recommendations" => Some(RoleId::DiningExpert),
        "get_weather_and_packing_advice" => Some(RoleId::WeatherAdvisor),
        "compile_travel_report" => Some(RoleId::ReportCompiler),
        "evaluate_report" => Some(RoleId::ReportEvaluator),
        _ => None,
    }
}

/// Holds the resolved role definitions and task templates for a run.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    roles: HashMap<RoleId, RoleDefinition>,
    tasks: HashMap<RoleId, TaskTemplate>,
}

impl ConfigStore {
    /// The built-in defaults, one definition and one task per role.
    pub fn builtin() -> Self {
        let roles = defaults::builtin_roles()
            .into_iter()
            .map(|def| (def.role_id, def))
            .collect();
        let tasks = defaults::builtin_tasks()
            .into_iter()
            .map(|task| (task.role_id, task))
            .collect();
        Self { roles, tasks }
    }

    /// Built-in defaults merged with any overrides found in `dir`.
    pub fn load_or_default(dir: impl AsRef<Path>) -> Self {
        let mut store = Self::builtin();
        let dir = dir.as_ref();

        let roles_path = dir.join("roles.yaml");
        if roles_path.is_file() {
            match store.merge_roles_file(&roles_path) {
                Ok(count) => log::info!(
                    "Loaded {} role override(s) from {}",
                    count,
                    roles_path.display()
                ),
                Err(e) => log::warn!("Ignoring role config: {}", e),
            }
        }

        let tasks_path = dir.join("tasks.yaml");
        if tasks_path.is_file() {
            match store.merge_tasks_file(&tasks_path) {
                Ok(count) => log::info!(
                    "Loaded {} task override(s) from {}",
                    count,
                    tasks_path.display()
                ),
                Err(e) => log::warn!("Ignoring task config: {}", e),
            }
        }

        store
    }

    pub fn role(&self, id: RoleId) -> Option<&RoleDefinition> {
        self.roles.get(&id)
    }

    pub fn task(&self, id: RoleId) -> Option<&TaskTemplate> {
        self.tasks.get(&id)
    }

    /// Replace a role definition programmatically.
    pub fn insert_role(&mut self, definition: RoleDefinition) {
        self.roles.insert(definition.role_id, definition);
    }

    /// Replace a task template programmatically.
    pub fn insert_task(&mut self, template: TaskTemplate) {
        self.tasks.insert(template.role_id, template);
    }

    fn merge_roles_file(&mut self, path: &Path) -> Result<usize, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let raw: HashMap<String, RawRoleConfig> =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
                path: path.display().to_string(),
                source,
            })?;

        let mut count = 0;
        for (key, entry) in raw {
            let Ok(role_id) = RoleId::from_str(&key) else {
                log::warn!("Unknown role '{}' in {}, skipping", key, path.display());
                continue;
            };
            let definition = self.roles.entry(role_id).or_insert_with(|| RoleDefinition {
                role_id,
                title: String::new(),
                goal_template: String::new(),
                backstory_template: String::new(),
            });
            if let Some(title) = entry.role {
                definition.title = title;
            }
            if let Some(goal) = entry.goal {
                definition.goal_template = goal;
            }
            if let Some(backstory) = entry.backstory {
                definition.backstory_template = backstory;
            }
            count += 1;
        }
        Ok(count)
    }

    fn merge_tasks_file(&mut self, path: &Path) -> Result<usize, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let raw: HashMap<String, RawTaskConfig> =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
                path: path.display().to_string(),
                source,
            })?;

        let mut count = 0;
        for (key, entry) in raw {
            let assigned = entry
                .agent
                .as_deref()
                .and_then(|agent| RoleId::from_str(agent).ok());
            let Some(role_id) = assigned.or_else(|| task_role(&key)) else {
                log::warn!("Unknown task '{}' in {}, skipping", key, path.display());
                continue;
            };
            let template = self.tasks.entry(role_id).or_insert_with(|| TaskTemplate {
                name: key.clone(),
                role_id,
                description_template: String::new(),
                expected_output: String::new(),
            });
            template.name = key;
            if let Some(description) = entry.description {
                template.description_template = description;
            }
            if let Some(expected_output) = entry.expected_output {
                template.expected_output = expected_output;
            }
            count += 1;
        }
        Ok(count)
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::CANONICAL_ORDER;

    #[test]
    fn test_builtin_covers_every_role() {
        let store = ConfigStore::builtin();
        for role in CANONICAL_ORDER {
            assert!(store.role(role).is_some(), "missing role {role}");
            assert!(store.task(role).is_some(), "missing task for {role}");
        }
    }

    #[test]
    fn test_builtin_templates_use_trip_placeholders() {
        let store = ConfigStore::builtin();
        let transport = store.role(RoleId::TransportPlanner).unwrap();
        assert!(transport.goal_template.contains("{starting_point}"));
        assert!(transport.goal_template.contains("{destination}"));

        let dining = store.task(RoleId::DiningExpert).unwrap();
        assert_eq!(dining.name, "get_dining_recommendations");
        assert!(dining.description_template.contains("{destination}"));
    }

    #[test]
    fn test_load_or_default_missing_dir() {
        let store = ConfigStore::load_or_default("/nonexistent/config/dir");
        assert!(store.role(RoleId::LocalGuide).is_some());
    }

    #[test]
    fn test_override_merges_per_field() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("roles.yaml"),
            "local_guide:\n  goal: Custom goal for {destination}\n",
        )
        .unwrap();

        let store = ConfigStore::load_or_default(dir.path());
        let guide = store.role(RoleId::LocalGuide).unwrap();
        assert_eq!(guide.goal_template, "Custom goal for {destination}");
        // Fields absent from the override keep their defaults.
        assert_eq!(guide.title, "Destination Expert & Cultural Context Provider");
        assert!(!guide.backstory_template.is_empty());
    }

    #[test]
    fn test_legacy_role_keys_accepted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("roles.yaml"),
            "yelp_dining_expert:\n  role: Food Scout\n",
        )
        .unwrap();

        let store = ConfigStore::load_or_default(dir.path());
        assert_eq!(store.role(RoleId::DiningExpert).unwrap().title, "Food Scout");
    }

    #[test]
    fn test_unknown_role_key_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("roles.yaml"),
            "submarine_captain:\n  role: Captain\nlocal_guide:\n  role: Guide\n",
        )
        .unwrap();

        let store = ConfigStore::load_or_default(dir.path());
        assert_eq!(store.role(RoleId::LocalGuide).unwrap().title, "Guide");
    }

    #[test]
    fn test_malformed_yaml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tasks.yaml"), ": : not yaml [").unwrap();

        let store = ConfigStore::load_or_default(dir.path());
        let task = store.task(RoleId::TransportPlanner).unwrap();
        assert_eq!(task.name, "find_transportation");
    }

    #[test]
    fn test_task_agent_override() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("tasks.yaml"),
            "custom_research:\n  description: Research {destination}\n  expected_output: Notes\n  agent: local_guide\n",
        )
        .unwrap();

        let store = ConfigStore::load_or_default(dir.path());
        let task = store.task(RoleId::LocalGuide).unwrap();
        assert_eq!(task.name, "custom_research");
        assert_eq!(task.description_template, "Research {destination}");
    }
}
