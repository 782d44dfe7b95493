//! # agora-entity
//!
//! Domain entity models for Agora. Every struct in this crate represents
//! a database table row or a domain value object. All entities derive
//! `Debug`, `Clone`, `Serialize`, `Deserialize`, and database entities
//! additionally derive `sqlx::FromRow`.

pub mod forum;
pub mod notification;
pub mod response;
pub mod user;
pub mod vote;
