//! `taxalign-recon`: catalog taxonomy reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded catalogs, returns category,
//! attribute and list-of-values matches. No CLI dependencies; file access
//! belongs to the caller.

pub mod config;
pub mod engine;
pub mod error;
pub mod load;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod report;
pub mod similarity;

pub use config::{MatchConfig, ReconConfig};
pub use engine::{run, Matcher};
pub use error::ReconError;
pub use load::load_catalog;
pub use model::{
    AttributeMatch, Catalog, CategoryMatch, MatchKind, MatchRecord, ReconResult, ReconSummary,
    ValueMatch,
};
pub use report::generate_report;
