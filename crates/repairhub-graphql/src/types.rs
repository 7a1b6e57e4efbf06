//! GraphQL object types.
//!
//! Records are rebuilt from the upstream response on every request. Text
//! fields are nullable because the upstream may omit them; numeric and
//! boolean fields are always populated (zero/false when the upstream is
//! silent) and therefore non-null in the schema.

use async_graphql::SimpleObject;

#[derive(Debug, Clone, Default, PartialEq, SimpleObject)]
pub struct User {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    /// Role as reported by the upstream, e.g. `ADMIN`, `TECHNICIAN`, `USER`.
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, SimpleObject)]
pub struct SparePart {
    pub id: Option<String>,
    pub name: Option<String>,
    pub price: f64,
    pub stock: i64,
}

/// A maintenance service offered by the workshop.
#[derive(Debug, Clone, Default, PartialEq, SimpleObject)]
pub struct MaintenanceService {
    pub id: Option<String>,
    pub service_name: Option<String>,
    pub description: Option<String>,
    pub base_price: f64,
    pub estimated_time_minutes: i64,
    pub requires_parts: bool,
    #[graphql(name = "type")]
    pub kind: Option<String>,
    pub active: bool,
}

/// One line item of a repair order.
#[derive(Debug, Clone, Default, PartialEq, SimpleObject)]
pub struct RepairOrderDetail {
    pub id: Option<String>,
    /// Present only when the upstream identified the service.
    pub service: Option<MaintenanceService>,
    pub unit_price: f64,
    pub discount: f64,
    pub sub_total: f64,
    pub status: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, SimpleObject)]
pub struct RepairOrder {
    pub id: Option<String>,
    pub details: Vec<RepairOrderDetail>,
    pub total: f64,
    pub status: Option<String>,
    /// Owner of the equipment under repair.
    pub client_id: Option<String>,
    /// Technician assigned to the order or to its first attended line item.
    pub technician_id: Option<String>,
}

/// Repair order counters.
#[derive(Debug, Clone, Default, PartialEq, SimpleObject)]
pub struct OrdersOverview {
    pub total: i64,
    pub active: i64,
}
