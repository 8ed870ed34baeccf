//! Backend job API trait and its HTTP and scripted implementations

pub mod client;
pub mod http;
pub mod mock;

pub use client::JobApi;
pub use http::{HttpApiConfig, HttpJobApi};
pub use mock::MockJobApi;
