// src/handlers/mod.rs
pub mod countries;
pub mod error;
pub mod predict;
