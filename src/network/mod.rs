pub mod http_models;

#[cfg(feature = "http")]
pub mod http_server;

#[cfg(feature = "http")]
pub use http_server::run_http_server;
