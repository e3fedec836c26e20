//! `idrecon-engine` — Identity field reconciliation engine.
//!
//! Pure engine crate: compares user-typed identity fields against values
//! extracted from a document and returns a scored, diffed verdict.
//! No CLI or IO dependencies.

pub mod config;
pub mod diff;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod field;
pub mod model;
pub mod similarity;

pub use config::MatchConfig;
pub use engine::{build_input, run};
pub use error::EngineError;
pub use field::FieldKind;
pub use model::{FieldPair, ReconInput, Verdict};
