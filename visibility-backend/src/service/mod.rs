// visibility-backend/src/service/mod.rs
pub mod access_grant_service;
pub mod org_unit_service;
pub mod visibility_resolver;
pub mod visibility_service;
