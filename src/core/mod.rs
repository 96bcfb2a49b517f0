//! Catalog and merge engine.
//!
//! Data flows one way at build time:
//!
//! 1. `extract`: per-format scanners turn source files into ordered strings
//! 2. `catalog`: strings get identifiers (`ident`) and fingerprints, grouped
//!    into one immutable generation
//! 3. `diff`: two generations are classified id by id
//! 4. `store`: diff outcomes, machine suggestions and review actions are
//!    merged into per-language translation stores (`sync` ties 3 and 4)
//!
//! `export` reads a store on demand and never writes to it.

pub mod catalog;
pub mod context;
pub mod diff;
pub mod error;
pub mod export;
pub mod extract;
pub mod file_scanner;
pub mod glossary;
pub mod ident;
pub mod persist;
pub mod provider;
pub mod store;
pub mod sync;

pub use catalog::{Catalog, StringRecord};
pub use context::RunContext;
pub use diff::{CatalogDiff, DiffKind};
pub use store::{Status, TranslationEntry, TranslationStore};
