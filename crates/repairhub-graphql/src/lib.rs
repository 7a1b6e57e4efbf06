//! # repairhub-graphql
//!
//! GraphQL resolution layer for the RepairHub administrative API.
//!
//! The crate sits in front of the RepairHub REST service and exposes a typed
//! graph of users, spare parts, maintenance services and repair orders. It
//! provides:
//!
//! - Bearer credential extraction from inbound request headers
//! - An upstream client that forwards the credential on every REST call
//! - Normalization of loosely-shaped upstream JSON into typed records
//! - Query and mutation resolvers assembled into one schema
//! - Axum handlers for the GraphQL endpoint and the GraphiQL playground
//!
//! ## Endpoints
//!
//! - `POST /graphql` - Execute a GraphQL operation
//! - `GET /graphql` - Execute via URL params, or serve GraphiQL
//!
//! ## Configuration
//!
//! ```toml
//! [upstream]
//! base_url = "http://localhost:3000"
//! timeout_secs = 10
//!
//! [graphql]
//! max_depth = 15
//! max_complexity = 500
//! introspection = true
//! playground = true
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Upstream and schema configuration
//! - [`credential`] - Authorization header extraction
//! - [`upstream`] - HTTP client for the REST backend
//! - [`normalize`] - Upstream JSON to typed records
//! - [`types`] - GraphQL object types
//! - [`resolvers`] - Query and mutation roots
//! - [`schema`] - Schema assembly
//! - [`context`] - Per-request GraphQL context
//! - [`handler`] - Axum HTTP handlers
//! - [`error`] - Error types

pub mod config;
pub mod context;
pub mod credential;
pub mod error;
pub mod handler;
pub mod normalize;
pub mod resolvers;
pub mod schema;
pub mod types;
pub mod upstream;

// Re-export main types
pub use config::{GraphQLConfig, UpstreamConfig};
pub use context::GraphQLContext;
pub use credential::{extract_bearer, normalize_bearer};
pub use error::{GatewayError, NormalizeError, UpstreamError};
pub use handler::{GRAPHQL_PATH, GraphQLState, graphql_handler, graphql_handler_get};
pub use schema::{GatewaySchema, build_schema};
pub use upstream::UpstreamClient;
