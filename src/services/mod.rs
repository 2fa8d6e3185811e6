// src/services/mod.rs
pub mod dataset;
pub mod forecast;
pub mod forest;
pub mod model_store;
pub mod policy;
