//! Bucketeer: a small HTTP/JSON service for managing items.
//!
//! The `/items` collection supports create, list, fetch, replace and
//! delete. Storage sits behind the [`db::ItemStore`] trait with a
//! `PostgreSQL` backend and an in-memory backend.

pub mod config;
pub mod db;
pub mod handler;
pub mod http;
pub mod logger;
pub mod models;
pub mod server;
