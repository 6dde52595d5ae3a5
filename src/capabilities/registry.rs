//! Registry resolving capability names to providers.

use std::sync::Arc;

use crate::roles::RoleId;

use super::CapabilityProvider;

/// A registered provider with its availability sampled at registration time.
#[derive(Debug, Clone)]
pub struct CapabilityBinding {
    pub name: String,
    pub provider: Arc<dyn CapabilityProvider>,
    pub available: bool,
}

/// Holds every registered capability for a run.
///
/// Registration order is preserved so that a role's bound capabilities come
/// back in a stable order. Re-registering a name replaces the previous
/// provider.
#[derive(Debug, Default)]
pub struct CapabilityRegistry {
    bindings: Vec<CapabilityBinding>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the built-in offline capabilities.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(super::ClothingRecommendation::new()));
        registry
    }

    /// Register a provider under its own name.
    pub fn register(&mut self, provider: Arc<dyn CapabilityProvider>) {
        let name = provider.name().to_string();
        let available = provider.available();
        if !available {
            log::debug!("Capability '{}' registered but unavailable", name);
        }
        if let Some(existing) = self.bindings.iter_mut().find(|b| b.name == name) {
            existing.provider = provider;
            existing.available = available;
        } else {
            self.bindings.push(CapabilityBinding {
                name,
                provider,
                available,
            });
        }
    }

    /// Look up an available provider by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn CapabilityProvider>> {
        self.bindings
            .iter()
            .find(|b| b.name == name && b.available)
            .map(|b| Arc::clone(&b.provider))
    }

    /// Resolve the providers a role should run with.
    ///
    /// Roles that bind everything (the evaluator) get every available
    /// provider; all other roles get the available subset of their required
    /// capability names, in the role's declared order. Missing or
    /// unavailable names are logged and skipped.
    pub fn bind_for_role(&self, role: RoleId) -> Vec<Arc<dyn CapabilityProvider>> {
        if role.binds_all_capabilities() {
            return self
                .bindings
                .iter()
                .filter(|b| b.available)
                .map(|b| Arc::clone(&b.provider))
                .collect();
        }

        let mut providers = Vec::new();
        for name in role.required_capabilities() {
            match self.get(name) {
                Some(provider) => providers.push(provider),
                None => log::debug!(
                    "Capability '{}' unavailable for role '{}', continuing without it",
                    name,
                    role
                ),
            }
        }
        providers
    }

    /// Names of all available capabilities, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.bindings
            .iter()
            .filter(|b| b.available)
            .map(|b| b.name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
