//! Axum HTTP handlers for the GraphQL endpoint.
//!
//! This module provides the HTTP handlers for GraphQL requests:
//! - `POST /graphql` - Execute a GraphQL operation
//! - `GET /graphql` - Execute via URL params, or serve GraphiQL when no
//!   `query` param is given and the playground is enabled
//!
//! The inbound `authorization` header is normalized into a bearer credential
//! and placed in the per-request context so every resolver forwards it
//! upstream.

use async_graphql::http::GraphiQLSource;
use async_graphql::{Request, Response, Variables};
use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::{GraphQLContext, UNKNOWN_REQUEST_ID};
use crate::credential::extract_bearer;
use crate::schema::GatewaySchema;

/// Path the GraphQL endpoint is mounted on.
pub const GRAPHQL_PATH: &str = "/graphql";

/// State shared across GraphQL handlers.
#[derive(Clone)]
pub struct GraphQLState {
    pub schema: GatewaySchema,

    /// Serve GraphiQL on `GET /graphql` without a query.
    pub playground: bool,
}

/// GraphQL request body.
#[derive(Debug, Deserialize)]
pub struct GraphQLRequest {
    /// The GraphQL query string.
    pub query: String,

    /// Optional operation name for multi-operation documents.
    #[serde(rename = "operationName")]
    pub operation_name: Option<String>,

    /// Optional variables for the query.
    pub variables: Option<serde_json::Value>,
}

/// Query parameters for GET requests.
#[derive(Debug, Deserialize)]
pub struct GraphQLQueryParams {
    pub query: Option<String>,

    #[serde(rename = "operationName")]
    pub operation_name: Option<String>,

    /// Optional variables (JSON string).
    pub variables: Option<String>,
}

/// Standard GraphQL response envelope.
#[derive(Debug, Serialize)]
pub struct GraphQLResponse {
    pub data: serde_json::Value,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<serde_json::Value>,
}

impl From<Response> for GraphQLResponse {
    fn from(resp: Response) -> Self {
        let data = serde_json::to_value(&resp.data).unwrap_or(serde_json::Value::Null);
        let errors = resp
            .errors
            .iter()
            .map(|e| serde_json::to_value(e).unwrap_or_else(|_| serde_json::json!({"message": e.message})))
            .collect();

        Self { data, errors }
    }
}

/// Handles POST requests to `/graphql`.
pub async fn graphql_handler(
    State(state): State<GraphQLState>,
    headers: HeaderMap,
    Json(request): Json<GraphQLRequest>,
) -> impl IntoResponse {
    execute_graphql(&state, &headers, request).await.into_response()
}

/// Handles GET requests to `/graphql`.
///
/// With a `query` param the operation is executed; without one the GraphiQL
/// playground is served if enabled.
pub async fn graphql_handler_get(
    State(state): State<GraphQLState>,
    headers: HeaderMap,
    Query(params): Query<GraphQLQueryParams>,
) -> impl IntoResponse {
    if params.query.is_none() {
        if state.playground {
            return Html(playground_html()).into_response();
        }
        return error_response(StatusCode::NOT_FOUND, "GraphQL playground is disabled")
            .into_response();
    }

    let request = match params_to_request(params) {
        Ok(req) => req,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, &format!("Invalid variables: {e}"))
                .into_response();
        }
    };

    execute_graphql(&state, &headers, request).await.into_response()
}

/// Returns the GraphiQL page pointed at the GraphQL endpoint.
#[must_use]
pub fn playground_html() -> String {
    GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish()
}

/// Executes a GraphQL request.
async fn execute_graphql(
    state: &GraphQLState,
    headers: &HeaderMap,
    request: GraphQLRequest,
) -> impl IntoResponse {
    let request_id = headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or(UNKNOWN_REQUEST_ID)
        .to_string();

    let credential = extract_bearer(headers);
    debug!(
        request_id = %request_id,
        authenticated = credential.is_some(),
        operation = ?request.operation_name,
        "Processing GraphQL request"
    );

    let context = GraphQLContext::new(credential, request_id);

    let mut gql_request = Request::new(request.query);
    if let Some(op_name) = request.operation_name {
        gql_request = gql_request.operation_name(op_name);
    }
    if let Some(vars) = request.variables {
        gql_request = gql_request.variables(Variables::from_json(vars));
    }
    gql_request = gql_request.data(context);

    let response = state.schema.execute(gql_request).await;
    if response.is_err() {
        debug!(errors = response.errors.len(), "GraphQL request completed with errors");
    }

    // GraphQL always returns 200 OK, errors travel in the body
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(GraphQLResponse::from(response)),
    )
        .into_response()
}

/// Converts GET query params to a GraphQL request.
fn params_to_request(params: GraphQLQueryParams) -> Result<GraphQLRequest, serde_json::Error> {
    let variables = if let Some(vars_str) = params.variables {
        Some(serde_json::from_str(&vars_str)?)
    } else {
        None
    };

    Ok(GraphQLRequest {
        query: params.query.unwrap_or_default(),
        operation_name: params.operation_name,
        variables,
    })
}

/// Returns a non-GraphQL error response in the standard envelope.
fn error_response(status: StatusCode, message: &str) -> impl IntoResponse {
    let body = serde_json::json!({
        "errors": [{ "message": message }]
    });

    (status, [(header::CONTENT_TYPE, "application/json")], Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_request_deserialize() {
        let json = r#"{
            "query": "{ users { id } }",
            "operationName": "ListUsers",
            "variables": {"foo": "bar"}
        }"#;

        let request: GraphQLRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.query, "{ users { id } }");
        assert_eq!(request.operation_name, Some("ListUsers".to_string()));
        assert!(request.variables.is_some());
    }

    #[test]
    fn test_graphql_request_minimal() {
        let json = r#"{"query": "{ users { id } }"}"#;

        let request: GraphQLRequest = serde_json::from_str(json).unwrap();
        assert!(request.operation_name.is_none());
        assert!(request.variables.is_none());
    }

    #[test]
    fn test_params_to_request() {
        let params = GraphQLQueryParams {
            query: Some("query($id: ID!) { user(id: $id) { id } }".to_string()),
            operation_name: None,
            variables: Some(r#"{"id": "42"}"#.to_string()),
        };

        let request = params_to_request(params).unwrap();
        assert_eq!(request.variables, Some(serde_json::json!({"id": "42"})));
    }

    #[test]
    fn test_params_to_request_invalid_variables() {
        let params = GraphQLQueryParams {
            query: Some("{ users { id } }".to_string()),
            operation_name: None,
            variables: Some("not valid json".to_string()),
        };

        assert!(params_to_request(params).is_err());
    }

    #[test]
    fn test_playground_points_at_endpoint() {
        let html = playground_html();
        assert!(html.contains(GRAPHQL_PATH));
    }
}
