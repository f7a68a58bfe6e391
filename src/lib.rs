//! Folio - content monetization backend
//!
//! Serves blogs and downloadable resources that are free, sold one at a time,
//! or gated behind a subscription. Checkout runs through an order-based
//! payment gateway; entitlements are granted only after the gateway's
//! signature has been verified.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
