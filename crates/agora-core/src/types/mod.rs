//! Core type definitions used across the Agora workspace.

pub mod pagination;

pub use pagination::{PageRequest, PageResponse};
