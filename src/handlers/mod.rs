// handlers/mod.rs - two security tiers
//
// Public (no auth) -> Protected (bearer token required, identity attached by
// jwt_auth_middleware and passed explicitly into the services)
pub mod form;
pub mod protected;
pub mod public;

use uuid::Uuid;

use crate::error::ApiError;

/// Parse a path id. Ids that cannot exist are reported as not found.
pub(crate) fn parse_id(raw: &str, not_found: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(not_found))
}
