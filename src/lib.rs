#![forbid(unsafe_code)]

pub mod chart;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod graph;
pub mod serve;
pub mod source;
pub mod util;
