//! Candidate key tables.
//!
//! The upstream is inconsistent about naming: the same logical value can show
//! up under camelCase, snake_case or lowercase keys, or only inside a nested
//! relation. Each table lists the candidate locations for one logical field
//! in priority order; the first one holding a usable value wins.

/// A path of object keys, walked from the record root.
pub type KeyPath = &'static [&'static str];

/// Locations of a repair order's line items.
pub const ORDER_DETAILS: &[&str] = &["details", "ticketServices", "repairOrderDetails"];

/// Locations of the client (equipment owner) of a repair order.
pub const ORDER_CLIENT_ID: &[KeyPath] = &[
    &["clientId"],
    &["client_id"],
    &["clientid"],
    &["equipment", "user", "id"],
    &["equipment", "userId"],
    &["evaluatedBy", "id"],
];

/// Locations of the technician on the repair order itself.
pub const ORDER_TECHNICIAN_ID: &[KeyPath] = &[
    &["technicianId"],
    &["technician_id"],
    &["technicianid"],
];

/// Locations of the technician on a single line item.
pub const DETAIL_TECHNICIAN_ID: &[KeyPath] = &[&["technician", "id"], &["technicianId"]];

/// Keys that make an embedded service worth materializing.
pub const SERVICE_IDENTITY: &[KeyPath] = &[&["id"], &["serviceName"]];
