pub mod cluster_transport;
pub mod config;
pub mod error;
pub mod merge;
pub mod model;
pub mod value_object;
