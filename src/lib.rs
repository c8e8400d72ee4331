//! ERP SDK: descriptor-driven REST backend library.
//!
//! One generic CRUD pipeline (validate, enrich, persist, shape) driven
//! by a declarative catalog of resource descriptors.

pub mod descriptor;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod ident;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use descriptor::{catalog, Registry, ResourceDescriptor};
pub use error::{AppError, ConfigError, Violation};
pub use ident::IdStrategy;
pub use response::{ListEnvelope, Pagination};
pub use routes::{common_routes, resource_routes};
pub use service::Pipeline;
pub use state::AppState;
pub use store::{ensure_database_exists, DocumentStore, MemoryStore, PgStore};
