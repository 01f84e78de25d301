//! # Plate Ledger Library
//!
//! Multi-tenant ledger of vehicle plate sales and commissions: owner-scoped
//! firms and vehicles, the sale record ledger, reporting aggregations and the
//! HTTP API that exposes them.

pub mod commission;
pub mod config;
pub mod credentials;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod normalization;
pub mod repositories;
pub mod scope;
pub mod server;
pub mod telemetry;
pub use migration;
