//! # PRG server
//! This module hosts the server code for the Product Replication Gateway. It is responsible for:
//! Listening for incoming product-creation webhook requests from the source store.
//! Verifying the webhook signature against the raw request body.
//! Replicating the product (and its size variations) into the target store's catalog.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/wc/webhook/product_created`: The webhook route for receiving product create events from the source store.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;

pub mod helpers;
pub mod middleware;
pub mod replication;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
