pub mod aggregation_service;
pub mod command_service;
