//! Larder Lifecycle
//!
//! Creates, inspects, partitions and destroys tenants ("projects") and their
//! environments against a document store, coordinating backups, sync
//! overrides, settings and user authorization.
//!
//! # Overview
//!
//! - [`Orchestrator`]: the tenant/environment operations, each gated by
//!   [`Orchestrator::check_tenant`]
//! - [`EnvironmentResolver`]: remote override, then local discovery, then a
//!   self-healing `"live"` bootstrap
//!
//! # Guarantees
//!
//! | Operation | Backup | Guard |
//! |-----------|--------|-------|
//! | `delete_tenant` | optional, before the drop | tenant exists |
//! | `delete_environment` | always, before any partition drop | tenant exists, not synced |
//! | `add_environment` | none | tenant exists, not synced |
//! | `create_tenant` | none | administrator, name unused |
//!
//! Collaborators are injected as `Arc<dyn Trait>` so each can be swapped for
//! a test double.

#![warn(missing_docs)]

mod error;
mod orchestrator;
mod resolver;

pub use error::{ErrorKind, LifecycleError, Result};
pub use orchestrator::{Collaborators, Orchestrator};
pub use resolver::EnvironmentResolver;
