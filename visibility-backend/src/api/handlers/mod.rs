// visibility-backend/src/api/handlers/mod.rs
pub mod access_handler;
pub mod org_unit_handler;
pub mod system_handler;
pub mod visibility_handler;
