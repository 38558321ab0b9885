//! Domain Layer - Core types and policy for mint custody review
//!
//! Pure types and logic with no I/O. All network access happens through
//! the ports layer.
//!
//! - `known_programs`: program ids, launch-program constants, label mapping
//! - `token`: TokenRecord and its flattened report views
//! - `classifier`: the PASS/FAIL/NOT_A_TOKEN rule table

pub mod known_programs;
pub mod token;
pub mod classifier;

pub use known_programs::{is_launch_family_candidate, ProgramLabels};
pub use token::{
    ExtensionSet, OwnerProgram, ProvenanceInfo, SecurityReview, TokenRecord, TokenReport,
    TokenSummary, NOT_AVAILABLE,
};
pub use classifier::{classify, classify_fields};
