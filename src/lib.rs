#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod cli;
pub mod config;
pub mod endpoint;
pub mod error;

pub use endpoint::{AudioFile, EndpointClient, EndpointError, Endpoints, SpeechStream};
