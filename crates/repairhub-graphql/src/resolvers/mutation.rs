//! Mutation root.

use async_graphql::{Context, Error as GraphQLError, ErrorExtensions, ID, Object};
use reqwest::StatusCode;
use serde_json::{Value, json};
use tracing::{Instrument, debug};

use super::{field_span, item_path, null_on_error, upstream};
use crate::normalize;
use crate::types::User;

/// Role assigned to new users when the caller does not pick one.
pub const DEFAULT_ROLE: &str = "USER";

fn default_role() -> Option<String> {
    Some(DEFAULT_ROLE.to_string())
}

/// Write operations over the upstream REST API.
#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Creates a user. The arguments are forwarded as the REST request body.
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        name: String,
        email: String,
        password: String,
        #[graphql(default_with = "default_role()")] role: Option<String>,
    ) -> Option<User> {
        let payload = json!({
            "name": name,
            "email": email,
            "password": password,
            "role": role,
        });
        let result = post_user(ctx, &payload).await;
        null_on_error(ctx, result)
    }

    /// Deletes a user.
    ///
    /// Non-2xx upstream answers are errors. Returns `true` for 200 and 204,
    /// `false` for any other success status.
    async fn delete_user(&self, ctx: &Context<'_>, id: ID) -> Option<bool> {
        let result = remove_user(ctx, &id).await;
        null_on_error(ctx, result)
    }
}

async fn post_user(ctx: &Context<'_>, payload: &Value) -> Result<User, GraphQLError> {
    let (client, credential) = upstream(ctx)?;
    let body = client
        .post("/users", payload, credential.as_deref())
        .instrument(field_span(ctx))
        .await
        .map_err(|e| e.extend())?;
    Ok(normalize::user(&body))
}

async fn remove_user(ctx: &Context<'_>, id: &ID) -> Result<bool, GraphQLError> {
    let (client, credential) = upstream(ctx)?;
    let status = client
        .delete(&item_path("users", id), credential.as_deref())
        .instrument(field_span(ctx))
        .await
        .map_err(|e| e.extend())?;

    let deleted = matches!(status, StatusCode::OK | StatusCode::NO_CONTENT);
    if !deleted {
        debug!(user_id = %id.as_str(), status = status.as_u16(), "Delete acknowledged without confirmation");
    }
    Ok(deleted)
}
