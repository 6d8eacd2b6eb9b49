pub mod config;
pub mod errors;
pub mod normalize;
pub mod profile;
pub mod routes;
pub mod schema;
pub mod state;
