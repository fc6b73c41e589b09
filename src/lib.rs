pub mod cli;
pub mod config;
pub mod features;
pub mod graphql;
pub mod index;
pub mod model;
pub mod routes;
pub mod syntax;
pub mod util;
pub mod views;
pub mod worker;
