//! Core library for the Transmeralda certificate portal: the document
//! listing service over blob storage and the presentation adapter that
//! consumes its envelope.

pub mod config;
pub mod documents;
pub mod error;
pub mod portal;
pub mod telemetry;
