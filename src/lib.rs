// Library exports for osma
// This allows integration tests and external code to use osma modules

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod db;
pub mod error;
pub mod form;
pub mod page;
pub mod routes;
pub mod state;
pub mod store;
