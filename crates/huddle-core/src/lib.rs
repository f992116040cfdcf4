//! Core Huddle library (auth kernel, identity client, config, logging).

pub mod auth;
pub mod config;
pub mod logging;
