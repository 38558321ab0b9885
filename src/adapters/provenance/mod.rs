//! Launch-Program Provenance
//!
//! Signature-history pager and genesis-transaction inspector. Only run for
//! mints matching the launch-family heuristic in `domain::known_programs`.

mod types;
mod verifier;

pub use types::{CreateAccountInfo, InstructionEntry, ParsedInstruction, SignatureInfo, TransactionResult};
pub use verifier::{ProvenanceVerifier, MAX_PAGE_SIZE};
