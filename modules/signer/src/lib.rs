pub mod endpoints;
pub mod model;
pub mod policy;
pub mod service;
