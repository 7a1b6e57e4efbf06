//! Schema assembly.
//!
//! Combines the query and mutation roots into one executable schema with the
//! upstream client attached as schema data.

use async_graphql::{EmptySubscription, Schema};

use crate::config::GraphQLConfig;
use crate::resolvers::{MutationRoot, QueryRoot};
use crate::upstream::UpstreamClient;

/// The executable gateway schema.
pub type GatewaySchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Builds the gateway schema.
#[must_use]
pub fn build_schema(client: UpstreamClient, config: &GraphQLConfig) -> GatewaySchema {
    let mut builder = Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(client)
        .limit_depth(config.max_depth)
        .limit_complexity(config.max_complexity);

    if !config.introspection {
        builder = builder.disable_introspection();
    }

    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpstreamConfig;

    fn schema(config: &GraphQLConfig) -> GatewaySchema {
        let client = UpstreamClient::new(&UpstreamConfig::default()).unwrap();
        build_schema(client, config)
    }

    #[test]
    fn test_sdl_exposes_operations() {
        let sdl = schema(&GraphQLConfig::default()).sdl();
        for field in [
            "users: [User!]\n",
            "user(id: ID!): User\n",
            "spareParts: [SparePart!]\n",
            "services: [MaintenanceService!]\n",
            "repairOrders: [RepairOrder!]\n",
            "ordersOverview: OrdersOverview\n",
            "deleteUser(id: ID!): Boolean\n",
        ] {
            assert!(sdl.contains(field), "missing `{field}` in SDL:\n{sdl}");
        }
        assert!(sdl.contains("createUser("));
        assert!(sdl.contains("serviceName: String"));
        assert!(sdl.contains("type: String"));
        assert!(sdl.contains("basePrice: Float!"));
        assert!(sdl.contains("technicianId: String"));
    }

    #[tokio::test]
    async fn test_introspection_toggle() {
        let query = "{ __schema { queryType { name } } }";

        let open = schema(&GraphQLConfig::default()).execute(query).await;
        assert!(open.errors.is_empty());

        let config = GraphQLConfig {
            introspection: false,
            ..GraphQLConfig::default()
        };
        let closed = schema(&config).execute(query).await;
        let json = serde_json::to_value(&closed).unwrap();
        assert!(json["data"]["__schema"].is_null());
    }

    #[tokio::test]
    async fn test_depth_limit() {
        let config = GraphQLConfig {
            max_depth: 2,
            ..GraphQLConfig::default()
        };
        let response = schema(&config)
            .execute("{ repairOrders { details { service { id } } } }")
            .await;
        assert!(!response.errors.is_empty());
    }
}
