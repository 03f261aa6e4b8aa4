//! Resource modules: one directory per aggregate, dto + handlers

pub mod analytics;
pub mod customers;
pub mod games;
pub mod health;
pub mod monitoring;
pub mod payments;
pub mod sessions;
pub mod stations;
