//! Transcat - source string catalog and translation workflow
//!
//! Transcat extracts user-facing strings from Vue templates, Markdown content
//! and Jinja templates into a versioned catalog, keeps one translation store per
//! target language in step with it, fills gaps through a machine translation
//! provider and exports reviewed translations as nested locale files.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (argument parsing, commands, output)
//! - `config`: Configuration file loading and parsing
//! - `core`: Catalog, diff, translation stores, provider client and export
//! - `issues`: Issue type definitions and reporting
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod utils;
