pub mod config;
pub mod constants;
pub mod logging;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod session;
pub mod simulator;
pub mod state;
