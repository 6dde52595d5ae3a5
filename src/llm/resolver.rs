//! Role identity resolution.
//!
//! Maps each role to a completion backend using the API keys present in the
//! environment. Roles have a preferred key with fallbacks, so a deployment
//! with a single `GEMINI_API_KEY` still resolves every role, while one with
//! per-role keys spreads load across them.

use std::collections::HashMap;
use std::sync::Arc;

use crate::environment::Environment;
use crate::roles::{RoleId, CANONICAL_ORDER};

use super::{CompletionBackend, GeminiCompletion};

pub const GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Environment keys tried for a role, in preference order.
fn key_chain(role: RoleId) -> &'static [&'static str] {
    match role {
        RoleId::TransportPlanner | RoleId::DiningExpert => &["GEMINI_API_KEY"],
        RoleId::AccommodationFinder => &["GEMINI_API_KEY_3", "GEMINI_API_KEY"],
        RoleId::LocalGuide | RoleId::WeatherAdvisor => &["GEMINI_API_KEY_2", "GEMINI_API_KEY"],
        RoleId::ReportCompiler | RoleId::ReportEvaluator => {
            &["GEMINI_API_KEY", "GEMINI_API_KEY_2", "GEMINI_API_KEY_3"]
        }
    }
}

/// Resolve completion backends for every role the environment can supply.
///
/// Roles whose key chain yields nothing are simply absent from the result;
/// whether that is fatal is the graph builder's call.
pub fn resolve_identities(env: &Environment) -> HashMap<RoleId, Arc<dyn CompletionBackend>> {
    let mut identities: HashMap<RoleId, Arc<dyn CompletionBackend>> = HashMap::new();

    for role in CANONICAL_ORDER {
        match env.first_of(key_chain(role)) {
            Some(key) => {
                let backend = GeminiCompletion::new(GEMINI_MODEL, Some(key.to_string()))
                    .with_max_output_tokens(1024);
                log::debug!("Resolved identity for role '{}' (model {})", role, GEMINI_MODEL);
                identities.insert(role, Arc::new(backend));
            }
            None => {
                log::debug!("No API key found for role '{}'", role);
            }
        }
    }

    log::info!(
        "Resolved {} of {} role identities",
        identities.len(),
        CANONICAL_ORDER.len()
    );
    identities
}
