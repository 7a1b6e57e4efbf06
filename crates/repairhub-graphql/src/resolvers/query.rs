//! Query root.

use async_graphql::{Context, Error as GraphQLError, ErrorExtensions, ID, Object};
use tracing::{Instrument, debug};

use super::{fetch, field_span, item_path, null_on_error, upstream};
use crate::normalize;
use crate::types::{MaintenanceService, OrdersOverview, RepairOrder, SparePart, User};

/// Read operations over the upstream REST API.
#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Lists all users.
    async fn users(&self, ctx: &Context<'_>) -> Option<Vec<User>> {
        let result = fetch(ctx, "/users", |raw| Ok(normalize::users(raw))).await;
        null_on_error(ctx, result)
    }

    /// Fetches one user. Returns `null` when the upstream answers 404.
    async fn user(&self, ctx: &Context<'_>, id: ID) -> Option<User> {
        let result = fetch_user(ctx, &id).await;
        null_on_error(ctx, result).flatten()
    }

    /// Lists spare parts in stock.
    async fn spare_parts(&self, ctx: &Context<'_>) -> Option<Vec<SparePart>> {
        let result = fetch(ctx, "/spare-parts", normalize::spare_parts).await;
        null_on_error(ctx, result)
    }

    /// Lists maintenance services.
    async fn services(&self, ctx: &Context<'_>) -> Option<Vec<MaintenanceService>> {
        let result = fetch(ctx, "/services", normalize::maintenance_services).await;
        null_on_error(ctx, result)
    }

    /// Lists repair orders with their line items.
    async fn repair_orders(&self, ctx: &Context<'_>) -> Option<Vec<RepairOrder>> {
        let result = fetch(ctx, "/repair-orders", normalize::repair_orders).await;
        null_on_error(ctx, result)
    }

    /// Repair order counters.
    async fn orders_overview(&self, ctx: &Context<'_>) -> Option<OrdersOverview> {
        let result = fetch(ctx, "/repair-orders/stats/overview", normalize::orders_overview).await;
        null_on_error(ctx, result)
    }
}

async fn fetch_user(ctx: &Context<'_>, id: &ID) -> Result<Option<User>, GraphQLError> {
    let (client, credential) = upstream(ctx)?;
    match client
        .get(&item_path("users", id), credential.as_deref())
        .instrument(field_span(ctx))
        .await
    {
        Ok(body) => Ok(Some(normalize::user(&body))),
        Err(e) if e.is_not_found() => {
            debug!(user_id = %id.as_str(), "User not found upstream");
            Ok(None)
        }
        Err(e) => Err(e.extend()),
    }
}
