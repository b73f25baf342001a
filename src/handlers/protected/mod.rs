// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every handler here receives the caller's `AuthUser` from
// jwt_auth_middleware and hands its id to the service as the requester.
pub mod posts;
pub mod users;
