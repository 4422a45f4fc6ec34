pub mod api_client;
mod cluster_transport;
