//! Triton - static file server for virtual hosts
//!
//! Core library for the HTTP/1.1 connection handling and configuration.

pub mod config;
pub mod error;
pub mod http;
pub mod server;
