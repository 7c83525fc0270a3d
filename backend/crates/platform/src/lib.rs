//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, HMAC-SHA256, random tokens)
//! - Password hashing (Argon2id)
//! - Cookie management
//! - Client IP resolution
//! - Rate limiting (fixed window, in-memory store)

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod password;
pub mod rate_limit;
