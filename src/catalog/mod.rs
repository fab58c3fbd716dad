//! Catalogue subsystem.
//!
//! # Data Flow
//! ```text
//! CLI command (add/update/delete)
//!     → types.rs (parse + validate inputs)
//!     → store.rs (uniqueness checks, then mutation)
//!     → storage (serialize root object back to disk)
//! ```
//!
//! # Design Decisions
//! - The catalogue is an explicit value passed to callers, never a global
//! - Endpoint identity is the `created` timestamp; URI keys are display and
//!   uniqueness handles, not identity
//! - Patches are explicit field lists; unknown fields fail deserialization

pub mod store;
pub mod types;

pub use store::{derive_project_key, Catalog};
pub use types::{
    BaseUrl, CatalogError, CatalogResult, Endpoint, EndpointPatch, HttpMethod,
    MethodPatch, MethodSet, Project, ProjectPatch, Protocol, UriTemplate,
};
