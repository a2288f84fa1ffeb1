//! HTTP surface for pagecraft: personalized delivery, the page builder API,
//! and contact import with bulk generation.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod state;
