// visibility-backend/src/domain/mod.rs
pub mod area_permit_model;
pub mod delegation_model;
pub mod employee_model;
pub mod employee_permit_model;
pub mod org_unit_model;
pub mod validity;
pub mod visibility_snapshot;
