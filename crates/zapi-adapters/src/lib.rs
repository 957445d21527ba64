//! Z-API WhatsApp gateway adapter.
//!
//! Two halves share this crate:
//!
//! - An action node: a `(resource, operation)` pair selects one row of the
//!   operation table in [`operations`], [`router`] turns the parameters into
//!   a request and [`client`] sends it to the instance's REST endpoint.
//! - A webhook trigger: [`trigger`] decides whether an incoming callback is
//!   emitted and attaches a `_metadata` summary.
//!
//! [`ZapiAdapter`] exposes the operation table through the [`Adapter`] trait
//! so a host can discover and invoke operations as tools.

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod node;
pub mod operations;
pub mod params;
pub mod phone;
pub mod request;
pub mod router;
pub mod traits;
pub mod trigger;

pub use client::{Dispatch, ZapiClient};
pub use config::Config;
pub use credentials::Credentials;
pub use error::{Result, ZapiError};
pub use node::ZapiAdapter;
pub use operations::{HttpMethod, OperationSpec, Resource};
pub use params::{ParameterSource, StaticParameters};
pub use request::ZapiRequest;
pub use router::{BatchError, BatchOptions, execute_batch};
pub use traits::{Adapter, AuthRequirement, HealthStatus, ToolDefinition};
pub use trigger::{Decision, DropReason, EventSelector, FilterOptions, ZapiTrigger};
