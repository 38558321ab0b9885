//! Token Records
//!
//! The record assembled for one mint address, its optional Token-2022
//! extension and provenance blocks, and the flattened views handed to the
//! report layer.

use serde::Serialize;
use std::fmt;

use super::known_programs::{
    ProgramLabels, SPL_TOKEN_PROGRAM_ID, SYSTEM_PROGRAM_ID, TOKEN_2022_PROGRAM_ID,
};

/// Sentinel for a display string that could not be resolved
pub const NOT_AVAILABLE: &str = "N/A";

/// Security verdict for a mint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityReview {
    /// No custody-relevant authority or extension is set
    Passed,
    /// At least one risk field is set
    Failed,
    /// The account is not owned by a recognized token program
    NotAToken,
}

impl SecurityReview {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityReview::Passed => "PASSED",
            SecurityReview::Failed => "FAILED",
            SecurityReview::NotAToken => "NOT_A_TOKEN",
        }
    }
}

impl fmt::Display for SecurityReview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Program that owns the looked-up account
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OwnerProgram {
    /// Standard SPL Token program
    SplToken,
    /// Token-2022 program with extensions
    Token2022,
    /// System Program - a plain wallet, not a mint
    System,
    /// Anything else
    Other(String),
}

impl OwnerProgram {
    pub fn from_id(program_id: &str) -> Self {
        match program_id {
            SPL_TOKEN_PROGRAM_ID => OwnerProgram::SplToken,
            TOKEN_2022_PROGRAM_ID => OwnerProgram::Token2022,
            SYSTEM_PROGRAM_ID => OwnerProgram::System,
            other => OwnerProgram::Other(other.to_string()),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            OwnerProgram::SplToken => SPL_TOKEN_PROGRAM_ID,
            OwnerProgram::Token2022 => TOKEN_2022_PROGRAM_ID,
            OwnerProgram::System => SYSTEM_PROGRAM_ID,
            OwnerProgram::Other(id) => id,
        }
    }

    /// Whether this is one of the two token programs
    pub fn is_token_program(&self) -> bool {
        matches!(self, OwnerProgram::SplToken | OwnerProgram::Token2022)
    }

    /// Display form used in reports, e.g. `Tokenkeg... (Token Program)`
    pub fn display(&self, labels: &ProgramLabels) -> String {
        match self {
            OwnerProgram::System => "System Program".to_string(),
            OwnerProgram::Other(id) => format!("{} (Not a token program)", id),
            token => format!("{} ({})", token.id(), labels.label(token.id())),
        }
    }
}

/// Token-2022 extension fields relevant to custody risk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtensionSet {
    pub permanent_delegate: Option<String>,
    /// Newer transfer fee; `Some(0)` means no fee
    #[serde(rename = "transaction_fees")]
    pub transfer_fee_basis_points: Option<u16>,
    #[serde(rename = "transfer_hook")]
    pub transfer_hook_authority: Option<String>,
    #[serde(rename = "confidential_transfers")]
    pub confidential_transfer_authority: Option<String>,
}

impl ExtensionSet {
    /// A non-zero transfer fee is configured
    pub fn charges_transfer_fee(&self) -> bool {
        matches!(self.transfer_fee_basis_points, Some(bps) if bps != 0)
    }

    /// Any of the four extension risk fields is set
    pub fn has_risk(&self) -> bool {
        self.permanent_delegate.is_some()
            || self.confidential_transfer_authority.is_some()
            || self.transfer_hook_authority.is_some()
            || self.charges_transfer_fee()
    }
}

/// Launch-program provenance facts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProvenanceInfo {
    #[serde(rename = "first_transaction")]
    pub first_transaction_signature: Option<String>,
    pub transaction_count: u64,
    #[serde(rename = "is_genuine_pump_fun_token")]
    pub is_genuine: bool,
}

/// Everything learned about one address.
///
/// Built from the primary account decode and filled in by the metadata and
/// provenance stages. Owned by the task that processes the address.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenRecord {
    pub address: String,
    pub name: String,
    pub symbol: String,
    pub owner_program: OwnerProgram,
    /// Rendered owner program, resolved against the label mapping
    pub owner_display: String,
    pub freeze_authority: Option<String>,
    pub update_authority: Option<String>,
    /// Only present for Token-2022 mints
    pub extensions: Option<ExtensionSet>,
    pub provenance: Option<ProvenanceInfo>,
    pub security_review: SecurityReview,
}

impl TokenRecord {
    /// Fresh record with sentinel names and no optional blocks
    pub fn new(address: impl Into<String>, owner_program: OwnerProgram, labels: &ProgramLabels) -> Self {
        let owner_display = owner_program.display(labels);
        let security_review = if owner_program.is_token_program() {
            SecurityReview::Failed
        } else {
            SecurityReview::NotAToken
        };

        Self {
            address: address.into(),
            name: NOT_AVAILABLE.to_string(),
            symbol: NOT_AVAILABLE.to_string(),
            owner_program,
            owner_display,
            freeze_authority: None,
            update_authority: None,
            extensions: None,
            provenance: None,
            security_review,
        }
    }

    /// Name or symbol is still the sentinel
    pub fn is_missing_display_names(&self) -> bool {
        self.name == NOT_AVAILABLE || self.symbol == NOT_AVAILABLE
    }

    /// Fill name/symbol from a secondary source without overwriting decoded values
    pub fn fill_display_names(&mut self, name: &str, symbol: &str) {
        if self.name == NOT_AVAILABLE && !name.is_empty() {
            self.name = name.to_string();
        }
        if self.symbol == NOT_AVAILABLE && !symbol.is_empty() {
            self.symbol = symbol.to_string();
        }
    }

    /// Flattened view for the report layer
    pub fn summary(&self) -> TokenSummary {
        TokenSummary {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            address: self.address.clone(),
            owner_program: self.owner_display.clone(),
            freeze_authority: self.freeze_authority.clone(),
            update_authority: self.update_authority.clone(),
            extensions: self.extensions.clone(),
            provenance: self.provenance.clone(),
            security_review: self.security_review,
        }
    }
}

/// Flat key/value view of a [`TokenRecord`].
///
/// Extension and provenance keys only appear when the record carries those
/// blocks; `security_review` is always last.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenSummary {
    pub name: String,
    pub symbol: String,
    pub address: String,
    pub owner_program: String,
    pub freeze_authority: Option<String>,
    pub update_authority: Option<String>,
    #[serde(flatten)]
    pub extensions: Option<ExtensionSet>,
    #[serde(flatten)]
    pub provenance: Option<ProvenanceInfo>,
    pub security_review: SecurityReview,
}

/// Status-tagged batch entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TokenReport {
    Success(TokenSummary),
    Error { address: String, error: String },
}

impl TokenReport {
    pub fn success(record: &TokenRecord) -> Self {
        TokenReport::Success(record.summary())
    }

    pub fn error(address: impl Into<String>, error: impl Into<String>) -> Self {
        TokenReport::Error {
            address: address.into(),
            error: error.into(),
        }
    }

    pub fn address(&self) -> &str {
        match self {
            TokenReport::Success(summary) => &summary.address,
            TokenReport::Error { address, .. } => address,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TokenReport::Success(_))
    }
}
