pub mod ai;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod mail;
pub mod pipeline;
pub mod render;
pub mod server;
