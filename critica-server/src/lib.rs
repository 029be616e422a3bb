//! # Critica Server
//!
//! REST backend for the Critica review platform.
//!
//! ## Overview
//!
//! - **Signup**: username + email, confirmation code delivered out of band
//! - **Tokens**: code-for-JWT exchange; claims carry role at issuance time
//! - **Catalog**: categories, genres, titles with derived ratings
//! - **Reviews**: one review per user per title, nested comments
//! - **Roles**: user / moderator / admin, checked by a pure policy before
//!   every mutation
//!
//! ## Architecture
//!
//! Built on Axum with PostgreSQL behind SQLx. The domain model and policy
//! live in `critica-core`; this crate binds them to HTTP.

pub mod api;
pub mod auth;
pub mod infra;
pub mod routes;
