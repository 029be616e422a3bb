//! # Critica Core
//!
//! Core library for the Critica review platform, providing the domain model,
//! authorization policy and persistence layer shared by the server binary.
//!
//! ## Overview
//!
//! - **User System**: email-confirmed signup, roles (user/moderator/admin)
//! - **Catalog**: categories, genres and titles with derived ratings
//! - **Reviews**: per-title reviews with scores and nested comments
//! - **Authorization**: a pure role/ownership policy consulted before every
//!   mutation
//! - **Persistence**: PostgreSQL repositories built on SQLx
//!
//! ## Architecture
//!
//! - [`user`]: identities, roles, token claims and signup payloads
//! - [`catalog`]: category/genre/title entities and their payloads
//! - [`review`]: review/comment entities and their payloads
//! - [`policy`]: `can_perform` capability checks
//! - [`validate`]: ordered per-payload validation rules
//! - [`confirmation`]: single-use confirmation code issue/verify
//! - [`notify`]: outbound notification port
//! - [`store`]: SQLx repositories

pub mod api_types;
pub mod catalog;
pub mod confirmation;
pub mod error;
pub mod notify;
pub mod policy;
pub mod review;
pub mod store;
pub mod user;
pub mod validate;

pub use error::{DomainError, Result};
