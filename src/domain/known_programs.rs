//! Known Program Addresses
//!
//! Constants for the token programs, the Metaplex metadata program and the
//! pump.fun launch program. Also holds the read-only label mapping used when
//! rendering the owner program of an account.

use std::collections::HashMap;

/// System Program (plain wallet accounts)
pub const SYSTEM_PROGRAM_ID: &str = "11111111111111111111111111111111";
/// Standard SPL Token program ID
pub const SPL_TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
/// Token-2022 program ID
pub const TOKEN_2022_PROGRAM_ID: &str = "TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb";
/// Metaplex Token Metadata program
pub const METADATA_PROGRAM_ID: &str = "metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s";

/// Pump.fun bonding-curve program
pub const PUMP_FUN_PROGRAM_ID: &str = "6EF8rrecthR5Dkzon8Nwu78hRvfCKubJ14M5uBEwF6P";
/// Update authority pump.fun stamps on every metadata account it creates
pub const PUMP_FUN_UPDATE_AUTHORITY: &str = "TSLvdd1pWpHVjahSpsvCXUbgwsL3JAcvokwaKt1eokM";
/// Vanity suffix of pump.fun mint addresses
pub const PUMP_FUN_MINT_SUFFIX: &str = "pump";

/// Label used when an owner program has no entry in the mapping
pub const UNKNOWN_OWNER_LABEL: &str = "Unknown Owner";

/// Read-only mapping from program id to a human label.
///
/// Built once at startup and shared by reference; it never changes afterwards.
#[derive(Debug, Clone)]
pub struct ProgramLabels {
    labels: HashMap<String, String>,
}

impl ProgramLabels {
    /// Build a mapping from explicit (program id, label) pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            labels: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Layer additional entries over this mapping; later entries win
    pub fn with_overrides<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.labels
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Human label for a program id
    pub fn label(&self, program_id: &str) -> &str {
        self.labels
            .get(program_id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_OWNER_LABEL)
    }
}

impl Default for ProgramLabels {
    fn default() -> Self {
        Self::from_pairs([
            (SPL_TOKEN_PROGRAM_ID, "Token Program"),
            (TOKEN_2022_PROGRAM_ID, "Token 2022 Program"),
        ])
    }
}

/// Cheap pre-check for the pump.fun family.
///
/// True when the mint carries the vanity suffix or its metadata update
/// authority is the pump.fun authority. Nothing else is inferred.
pub fn is_launch_family_candidate(address: &str, update_authority: Option<&str>) -> bool {
    address.ends_with(PUMP_FUN_MINT_SUFFIX) || update_authority == Some(PUMP_FUN_UPDATE_AUTHORITY)
}
