//! Identity module
//!
//! Authentication itself is delegated to the upstream identity layer; by
//! the time a request reaches this service the gateway has already verified
//! the caller and attached plain identity headers. This module only reads
//! them and makes the caller available to handlers as [`CurrentUser`].

mod extractor;
mod middleware;

pub use middleware::require_identity;

/// Tenant id header set by the identity gateway
pub const TENANT_HEADER: &str = "x-tenant-id";
/// User id header set by the identity gateway
pub const USER_HEADER: &str = "x-user-id";
/// Optional display name header
pub const USER_NAME_HEADER: &str = "x-user-name";

/// The authenticated caller, as reported by the upstream identity layer.
///
/// Both ids are opaque strings here; this service never interprets them
/// beyond scoping queries by `tenant_id`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub tenant_id: String,
    pub user_id: String,
    pub display_name: Option<String>,
}
