// Export modules for testing and benchmarking
pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod factory;
pub mod models;
pub mod rpc;
pub mod subproviders;
