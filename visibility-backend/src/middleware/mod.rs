// visibility-backend/src/middleware/mod.rs

pub mod auth;
