// tests/integration/mod.rs

pub mod access_grant_tests;
pub mod auth_tests;
pub mod org_unit_tests;
pub mod visibility_api_tests;
pub mod visibility_store_tests;
