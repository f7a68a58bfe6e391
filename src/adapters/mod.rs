//! Adapters - Implementations of port interfaces.
//!
//! - `auth` - Bearer token validation (JWT, mock)
//! - `email` - Transactional email (Resend, logging, recording)
//! - `http` - axum REST API
//! - `memory` - In-memory persistence for tests and local runs
//! - `object_storage` - Local filesystem media storage
//! - `postgres` - PostgreSQL persistence
//! - `razorpay` - Payment gateway (Razorpay, mock)

pub mod auth;
pub mod email;
pub mod http;
pub mod memory;
pub mod object_storage;
pub mod postgres;
pub mod razorpay;
