//! `SheetFind` - Find spreadsheets by sheet name or cell content.

#![warn(
    missing_debug_implementations,
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]

pub mod config;
pub mod discovery;
pub mod error;
pub mod inspector;
pub mod launch;
pub mod matcher;
pub mod policy;
pub mod report;
pub mod scanner;
pub mod types;

#[cfg(test)]
mod fixtures;
