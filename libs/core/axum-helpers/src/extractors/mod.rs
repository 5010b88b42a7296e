//! Custom extractors for Axum handlers.
//!
//! Rejections use the shared `ErrorResponse` body, so handlers only ever see
//! well-formed input.

pub mod id_path;

pub use id_path::IdPath;
