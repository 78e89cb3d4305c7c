//! Shared test utilities for mailharvest integration tests.
//!
//! This module provides:
//! - `FakeMailApi`, an in-memory mailbox that records calls
//! - `HttpStub`, a loopback HTTP server for gateway and token tests

#![allow(dead_code)]

pub mod fake_api;
pub mod http_stub;

pub use fake_api::*;
pub use http_stub::*;
