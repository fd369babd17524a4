//! QR Feedz schema, repositories and seeders.
//!
//! The `qrfeedz` binary drives [`commands`]; everything else is usable on
//! its own against any sea-orm connection.

pub mod commands;
pub mod conditional;
pub mod config;
pub mod error;
pub mod factories;
pub mod password;
pub mod seeders;
pub mod storage;

#[cfg(test)]
mod test_support;
