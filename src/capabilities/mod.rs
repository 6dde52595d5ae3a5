//! Named research capabilities bound to roles.
//!
//! A capability is an external information source (flight search, weather
//! forecast, POI lookup) exposed behind the [`CapabilityProvider`] trait.
//! Roles declare which capability names they need
//! ([`crate::roles::RoleId::required_capabilities`]); at graph construction
//! the [`CapabilityRegistry`] hands each role the subset that is actually
//! registered and available. A missing capability is never an error, the
//! role simply runs without it.

pub mod builtin;
pub mod registry;

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

pub use builtin::{ClothingRecommendation, StaticText};
pub use registry::{CapabilityBinding, CapabilityRegistry};

/// Keyword parameters handed to a provider call.
pub type CapabilityParams = HashMap<String, serde_json::Value>;

#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("capability '{name}' call failed: {message}")]
    CallFailed { name: String, message: String },

    #[error("capability '{name}' requires parameter '{param}'")]
    MissingParam { name: String, param: String },
}

/// A single research capability.
///
/// Implementations must be cheap to construct and side-effect free on
/// [`CapabilityProvider::available`], which is sampled once at registration.
#[async_trait]
pub trait CapabilityProvider: Send + Sync + std::fmt::Debug {
    /// Stable name roles reference, e.g. `"weather_forecast"`.
    fn name(&self) -> &str;

    /// Short human-readable description of what the capability returns.
    fn description(&self) -> &str;

    /// Whether the capability can currently be called (credentials present,
    /// endpoint configured). Defaults to available.
    fn available(&self) -> bool {
        true
    }

    /// Execute the capability with the given parameters.
    async fn call(&self, params: &CapabilityParams) -> Result<String, CapabilityError>;
}
