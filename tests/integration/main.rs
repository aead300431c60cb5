//! Integration tests with mock HTTP server

mod error_handling;
mod fallback;
mod mock_server;
mod streaming;
