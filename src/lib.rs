//! floating-toc: a floating table of contents for markdown views.
//!
//! The core (`controller`, `panel`, `navigator`, `geometry`) talks to its host only through the
//! traits in [`host`]. The remaining modules make up the bundled terminal host: a ratatui editor
//! and previewer whose heading metadata comes from tree-sitter-md.
#![allow(clippy::multiple_crate_versions)]

pub mod app_state;
pub mod config;
pub mod controller;
pub mod error;
pub mod formats;
pub mod geometry;
pub mod heading;
pub mod host;
pub mod input;
pub mod metadata;
pub mod navigator;
pub mod panel;
pub mod preferences;
pub mod settings;
pub mod ui;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
