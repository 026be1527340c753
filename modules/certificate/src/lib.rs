pub mod audit;
pub mod endpoints;
pub mod graph;
pub mod model;
pub mod service;
pub mod telemetry;
pub mod validator;
