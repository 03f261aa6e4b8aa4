//! SeaORM entities for the relational schema

pub mod customer;
pub mod daily_stat;
pub mod game;
pub mod payment;
pub mod session;
pub mod station;
