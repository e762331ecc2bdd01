//! Process-wide access to the service registry.
//!
//! Bootstrap code registers services here; gameplay code looks them up
//! without holding references to each other.

use std::sync::Arc;

use once_cell::sync::Lazy;

use super::locator::{Capabilities, ListenerId, ServiceKey, ServiceLocator};
use crate::config::process_config;
use crate::error::ServiceError;

static LOCATOR: Lazy<Arc<ServiceLocator>> =
    Lazy::new(|| Arc::new(ServiceLocator::with_config(process_config().services.clone())));

/// Shared handle to the process-wide locator.
pub fn locator() -> Arc<ServiceLocator> {
    Arc::clone(&LOCATOR)
}

pub fn register<T: ?Sized + Send + Sync + 'static>(instance: Arc<T>) {
    LOCATOR.register(instance);
}

pub fn register_with<T: ?Sized + Send + Sync + 'static>(
    instance: Arc<T>,
    capabilities: Capabilities,
) {
    LOCATOR.register_with(instance, capabilities);
}

pub fn get<T: ?Sized + Send + Sync + 'static>() -> Option<Arc<T>> {
    LOCATOR.get::<T>()
}

pub fn require<T: ?Sized + Send + Sync + 'static>() -> Result<Arc<T>, ServiceError> {
    LOCATOR.require::<T>()
}

pub fn get_all<C: ?Sized + Send + Sync + 'static>() -> Vec<Arc<C>> {
    LOCATOR.get_all::<C>()
}

pub fn on_registered<F>(listener: F) -> ListenerId
where
    F: Fn(&ServiceKey) + Send + Sync + 'static,
{
    LOCATOR.on_registered(listener)
}
