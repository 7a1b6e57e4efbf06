//! Upstream JSON normalization.
//!
//! Pure functions from raw upstream payloads to the typed records in
//! [`crate::types`]. The upstream mixes camelCase and snake_case keys, nests
//! some relations and omits fields freely, so every accessor tolerates
//! absence:
//!
//! - missing or `null` numbers become `0`
//! - missing booleans become `false`
//! - missing strings and nested objects stay `None`
//!
//! A numeric field that is present but not coercible is a hard error for the
//! whole payload, reported with the record and field name.
//!
//! List payloads that are not JSON arrays are treated as empty, and list
//! entries that are not JSON objects are skipped.

pub mod keys;
mod value;

use serde_json::Value;

use crate::error::NormalizeError;
use crate::types::{
    MaintenanceService, OrdersOverview, RepairOrder, RepairOrderDetail, SparePart, User,
};
use value::{boolean, decimal, first_identity, id, integer, lookup, text};

/// Returns the object entries of a list payload.
fn entries(raw: &Value) -> impl Iterator<Item = &Value> {
    raw.as_array()
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .filter(|entry| entry.is_object())
}

pub fn user(raw: &Value) -> User {
    User {
        id: id(raw),
        name: text(raw, "name"),
        email: text(raw, "email"),
        role: text(raw, "role"),
    }
}

pub fn users(raw: &Value) -> Vec<User> {
    entries(raw).map(user).collect()
}

pub fn spare_part(raw: &Value) -> Result<SparePart, NormalizeError> {
    const RECORD: &str = "SparePart";
    Ok(SparePart {
        id: id(raw),
        name: text(raw, "name"),
        price: decimal(raw, RECORD, "price")?,
        stock: integer(raw, RECORD, "stock")?,
    })
}

pub fn spare_parts(raw: &Value) -> Result<Vec<SparePart>, NormalizeError> {
    entries(raw).map(spare_part).collect()
}

pub fn maintenance_service(raw: &Value) -> Result<MaintenanceService, NormalizeError> {
    const RECORD: &str = "MaintenanceService";
    Ok(MaintenanceService {
        id: id(raw),
        service_name: text(raw, "serviceName"),
        description: text(raw, "description"),
        base_price: decimal(raw, RECORD, "basePrice")?,
        estimated_time_minutes: integer(raw, RECORD, "estimatedTimeMinutes")?,
        requires_parts: boolean(raw, "requiresParts"),
        kind: text(raw, "type"),
        active: boolean(raw, "active"),
    })
}

pub fn maintenance_services(raw: &Value) -> Result<Vec<MaintenanceService>, NormalizeError> {
    entries(raw).map(maintenance_service).collect()
}

/// Returns the raw line items of a repair order.
///
/// The first candidate key holding a non-null value wins, even when its list
/// is empty; later candidates are not consulted.
pub fn detail_entries(order: &Value) -> Vec<&Value> {
    keys::ORDER_DETAILS
        .iter()
        .find_map(|key| lookup(order, &[*key]))
        .map(|list| entries(list).collect())
        .unwrap_or_default()
}

/// Returns the embedded service of a line item if it is identifiable.
fn embedded_service(detail: &Value) -> Option<&Value> {
    lookup(detail, &["service"])
        .filter(|service| first_identity(service, keys::SERVICE_IDENTITY).is_some())
}

pub fn repair_order_detail(raw: &Value) -> Result<RepairOrderDetail, NormalizeError> {
    const RECORD: &str = "RepairOrderDetail";
    Ok(RepairOrderDetail {
        id: id(raw),
        service: embedded_service(raw).map(maintenance_service).transpose()?,
        unit_price: decimal(raw, RECORD, "unitPrice")?,
        discount: decimal(raw, RECORD, "discount")?,
        sub_total: decimal(raw, RECORD, "subTotal")?,
        status: text(raw, "status"),
        created_at: text(raw, "createdAt"),
        updated_at: text(raw, "updatedAt"),
    })
}

/// Resolves the client of a repair order from its flat or nested locations.
pub fn client_id(order: &Value) -> Option<String> {
    first_identity(order, keys::ORDER_CLIENT_ID)
}

/// Resolves the technician of a repair order.
///
/// Order-level keys win. Otherwise line items are scanned in order and the
/// first one naming a technician (nested `technician.id`, then flat
/// `technicianId`) decides.
pub fn technician_id(order: &Value) -> Option<String> {
    first_identity(order, keys::ORDER_TECHNICIAN_ID).or_else(|| {
        detail_entries(order)
            .into_iter()
            .find_map(|detail| first_identity(detail, keys::DETAIL_TECHNICIAN_ID))
    })
}

pub fn repair_order(raw: &Value) -> Result<RepairOrder, NormalizeError> {
    let details = detail_entries(raw)
        .into_iter()
        .map(repair_order_detail)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RepairOrder {
        id: id(raw),
        details,
        total: decimal(raw, "RepairOrder", "total")?,
        status: text(raw, "status"),
        client_id: client_id(raw),
        technician_id: technician_id(raw),
    })
}

pub fn repair_orders(raw: &Value) -> Result<Vec<RepairOrder>, NormalizeError> {
    entries(raw).map(repair_order).collect()
}

pub fn orders_overview(raw: &Value) -> Result<OrdersOverview, NormalizeError> {
    const RECORD: &str = "OrdersOverview";
    Ok(OrdersOverview {
        total: integer(raw, RECORD, "total")?,
        active: integer(raw, RECORD, "active")?,
    })
}
