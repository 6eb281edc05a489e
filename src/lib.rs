pub mod auth;
pub mod configuration;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod middleware;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod users;
pub mod validators;
