pub mod api;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod domain;
pub mod telemetry;
