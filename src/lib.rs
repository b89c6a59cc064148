//! Freight marketplace back-office admin panel.
//!
//! Resource list/edit pages with header actions (create, delete, export),
//! validated write requests and CSV exporters, served over axum.

pub mod config;
pub mod export;
pub mod handlers;
pub mod middleware;
pub mod panel;
pub mod requests;
pub mod routes;
pub mod startup;
