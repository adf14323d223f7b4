//! # tb_app
//!
//! Configuration, logging and a workload driver for embedding `tb_ratelimit`

pub mod cli;
pub mod config_loader;
pub mod error;
pub mod tracing_setup;
pub mod workload;
