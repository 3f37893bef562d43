#![warn(rust_2018_idioms)]

pub mod adapter;
pub mod app;
pub mod config;
pub mod error;
pub mod handler;
pub mod healthcheck;
pub mod model;
pub mod pdata;
pub mod port;
pub mod receiver;

#[cfg(test)]
mod test_support;

pub use healthcheck::{healthcheck, healthcheck_with_port};
