//! GraphQL resolvers for the administrative API.
//!
//! Each field performs the same steps: read the caller's credential from the
//! request context, make exactly one upstream call with it, normalize the
//! response, and return the typed result.
//!
//! A failing field is reported in `errors` and resolves to an explicit
//! `null`, so sibling fields and the `data` object are unaffected.
//!
//! - `query`: read operations (`users`, `user`, `spareParts`, `services`,
//!   `repairOrders`, `ordersOverview`)
//! - `mutation`: write operations (`createUser`, `deleteUser`)

mod mutation;
mod query;

pub use mutation::MutationRoot;
pub use query::QueryRoot;

use async_graphql::{Context, Error as GraphQLError, ErrorExtensions};
use serde_json::Value;
use tracing::{Instrument, debug_span};

use crate::context::GraphQLContext;
use crate::error::NormalizeError;
use crate::upstream::UpstreamClient;

/// Helper to fetch the upstream client and the caller's credential.
pub(crate) fn upstream<'a>(
    ctx: &'a Context<'_>,
) -> Result<(&'a UpstreamClient, Option<String>), GraphQLError> {
    let client = ctx
        .data::<UpstreamClient>()
        .map_err(|_| GraphQLError::new("Upstream client not available"))?;
    Ok((client, GraphQLContext::credential_of(ctx)))
}

/// Span wrapping the upstream call of one field.
pub(crate) fn field_span(ctx: &Context<'_>) -> tracing::Span {
    debug_span!(
        "graphql.field",
        field = %ctx.field().name(),
        request_id = %GraphQLContext::request_id_of(ctx)
    )
}

/// `GET path` with the caller's credential, normalizing the body.
pub(crate) async fn fetch<T>(
    ctx: &Context<'_>,
    path: &str,
    normalize: impl FnOnce(&Value) -> Result<T, NormalizeError>,
) -> Result<T, GraphQLError> {
    let (client, credential) = upstream(ctx)?;
    let body = client
        .get(path, credential.as_deref())
        .instrument(field_span(ctx))
        .await
        .map_err(|e| e.extend())?;
    normalize(&body).map_err(|e| e.extend())
}

/// Records `result`'s error on the response and resolves the field to `null`.
pub(crate) fn null_on_error<T>(ctx: &Context<'_>, result: Result<T, GraphQLError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            let err = ctx.set_error_path(err.into_server_error(ctx.item.pos));
            ctx.add_error(err);
            None
        }
    }
}

/// Builds `/{collection}/{id}` with the id percent-encoded.
pub(crate) fn item_path(collection: &str, id: &str) -> String {
    format!("/{collection}/{}", urlencoding::encode(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_path_encodes_id() {
        assert_eq!(item_path("users", "42"), "/users/42");
        assert_eq!(item_path("users", "a/b c"), "/users/a%2Fb%20c");
    }
}
