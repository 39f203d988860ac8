//! HTTP API: server wiring, routing, and response mapping for the dashboard views.

pub mod app;
