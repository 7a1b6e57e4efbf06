//! GraphQL execution context.
//!
//! Per-request state handed to resolvers through async-graphql's context
//! data. Shared dependencies (the upstream client) live on the schema
//! instead; this struct only carries what differs between requests.
//!
//! # Example
//!
//! ```ignore
//! use repairhub_graphql::GraphQLContext;
//!
//! let context = GraphQLContext::new(extract_bearer(&headers), "req-123");
//! let request = async_graphql::Request::new(query).data(context);
//! ```

use async_graphql::Context;

/// Request id used when the caller did not send one.
pub const UNKNOWN_REQUEST_ID: &str = "unknown";

/// Per-request GraphQL context.
#[derive(Debug, Clone)]
pub struct GraphQLContext {
    /// Normalized bearer credential of the caller (`None` when unauthenticated).
    pub credential: Option<String>,

    /// Request ID attached to every upstream call span.
    pub request_id: String,
}

impl GraphQLContext {
    #[must_use]
    pub fn new(credential: Option<String>, request_id: impl Into<String>) -> Self {
        Self {
            credential,
            request_id: request_id.into(),
        }
    }

    /// Reads the caller's credential from resolver context.
    ///
    /// A missing context entry is treated like a missing credential.
    #[must_use]
    pub fn credential_of(ctx: &Context<'_>) -> Option<String> {
        ctx.data_opt::<GraphQLContext>()
            .and_then(|gql_ctx| gql_ctx.credential.clone())
    }

    /// Reads the request id from resolver context.
    #[must_use]
    pub fn request_id_of<'a>(ctx: &'a Context<'_>) -> &'a str {
        ctx.data_opt::<GraphQLContext>()
            .map_or(UNKNOWN_REQUEST_ID, |gql_ctx| gql_ctx.request_id.as_str())
    }
}
