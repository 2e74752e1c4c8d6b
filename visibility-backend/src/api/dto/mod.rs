// visibility-backend/src/api/dto/mod.rs
pub mod access_dto;
pub mod employee_dto;
pub mod org_unit_dto;
