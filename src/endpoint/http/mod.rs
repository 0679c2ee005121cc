//! Shared HTTP utilities for endpoint calls.

mod client;
mod sse;

pub use client::{HttpClient, HttpTimeouts};
pub use sse::{SseEvent, SseParser};
