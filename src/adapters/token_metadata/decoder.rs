//! Account Decoders
//!
//! Two decode paths:
//! - primary: `jsonParsed` mint account -> [`DecodedAccount`]
//! - metadata: base64 Metaplex metadata account -> [`MetadataAccount`]
//!
//! Metaplex Metadata Account Layout (prefix read here):
//! - Offset 0:      key discriminator (u8)
//! - Offset 1-32:   update_authority (Pubkey, 32 bytes)
//! - Offset 33-64:  mint (Pubkey, 32 bytes)
//! - Offset 65:     name (u32 LE length + UTF-8 bytes, null padded)
//! - then:          symbol (u32 LE length + UTF-8 bytes, null padded)
//!
//! Neither path fails past its own boundary: the primary decoder maps every
//! missing field to `None`, and metadata failures come back as a
//! [`DecodeError`] the caller treats as "metadata unavailable".

use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;
use tracing::debug;

use super::types::{AccountData, AccountInfoValue, MintExtension};
use crate::domain::known_programs::METADATA_PROGRAM_ID;
use crate::domain::token::ExtensionSet;

const DISCRIMINATOR_LEN: usize = 1;
const PUBKEY_LEN: usize = 32;
const LENGTH_PREFIX_LEN: usize = 4;
/// Offset of the length-prefixed name
pub const NAME_OFFSET: usize = DISCRIMINATOR_LEN + PUBKEY_LEN + PUBKEY_LEN;

/// Seed prefix for metadata PDAs
const METADATA_SEED: &[u8] = b"metadata";

/// Metadata decode failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid base64: {0}")]
    Base64(String),

    #[error("buffer too short for {field}: need {needed} bytes, got {actual}")]
    Truncated {
        field: &'static str,
        needed: usize,
        actual: usize,
    },

    #[error("invalid UTF-8 in {field}")]
    InvalidUtf8 { field: &'static str },

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("account data is not base64 encoded")]
    UnexpectedEncoding,
}

/// Fields read from a primary `jsonParsed` account
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedAccount {
    pub owner: String,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub freeze_authority: Option<String>,
    pub update_authority: Option<String>,
    pub extensions: Vec<MintExtension>,
}

/// Decode a primary account. Non-parsed payloads (e.g. a system account)
/// yield the owner alone.
pub fn decode_primary_account(value: &AccountInfoValue) -> DecodedAccount {
    let mut decoded = DecodedAccount {
        owner: value.owner.clone(),
        ..Default::default()
    };

    let info = match &value.data {
        AccountData::Parsed(parsed) => &parsed.parsed.info,
        _ => return decoded,
    };

    decoded.name = info.name.clone();
    decoded.symbol = info.symbol.clone();
    decoded.freeze_authority = info.freeze_authority.clone();

    for entry in &info.extensions {
        match MintExtension::from_entry(entry) {
            Ok(MintExtension::Other(tag)) => debug!("Ignoring extension {}", tag),
            Ok(ext) => decoded.extensions.push(ext),
            Err(e) => debug!("Skipping malformed {} extension: {}", entry.extension, e),
        }
    }

    // tokenMetadata extension is the in-mint source of display names
    for ext in &decoded.extensions {
        if let MintExtension::TokenMetadata(meta) = ext {
            if meta.name.is_some() {
                decoded.name = meta.name.clone();
            }
            if meta.symbol.is_some() {
                decoded.symbol = meta.symbol.clone();
            }
            if meta.update_authority.is_some() {
                decoded.update_authority = meta.update_authority.clone();
            }
        }
    }

    decoded
}

/// Collapse typed extensions into the custody-risk fields.
///
/// The transfer fee is the newer fee's basis points; an absent fee config
/// leaves the field unset.
pub fn extension_set(extensions: &[MintExtension]) -> ExtensionSet {
    let mut set = ExtensionSet::default();
    for ext in extensions {
        match ext {
            MintExtension::PermanentDelegate(state) => {
                set.permanent_delegate = state.delegate.clone();
            }
            MintExtension::TransferFeeConfig(state) => {
                set.transfer_fee_basis_points = state
                    .newer_transfer_fee
                    .as_ref()
                    .and_then(|fee| fee.transfer_fee_basis_points);
            }
            MintExtension::TransferHook(state) => {
                set.transfer_hook_authority = state.authority.clone();
            }
            MintExtension::ConfidentialTransferMint(state) => {
                set.confidential_transfer_authority = state.authority.clone();
            }
            MintExtension::TokenMetadata(_) | MintExtension::Other(_) => {}
        }
    }
    set
}

/// Prefix of a Metaplex metadata account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataAccount {
    pub key: u8,
    pub update_authority: String,
    pub mint: String,
    pub name: String,
    pub symbol: String,
}

/// Decode a base64 metadata payload
pub fn decode_metadata_base64(encoded: &str) -> Result<MetadataAccount, DecodeError> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| DecodeError::Base64(e.to_string()))?;
    decode_metadata_account(&bytes)
}

/// Decode the fixed prefix of a metadata account
pub fn decode_metadata_account(data: &[u8]) -> Result<MetadataAccount, DecodeError> {
    if data.len() < NAME_OFFSET {
        return Err(DecodeError::Truncated {
            field: "header",
            needed: NAME_OFFSET,
            actual: data.len(),
        });
    }

    let key = data[0];
    let update_authority = bs58::encode(&data[DISCRIMINATOR_LEN..DISCRIMINATOR_LEN + PUBKEY_LEN]).into_string();
    let mint = bs58::encode(&data[DISCRIMINATOR_LEN + PUBKEY_LEN..NAME_OFFSET]).into_string();

    let (name, offset) = read_padded_string(data, NAME_OFFSET, "name")?;
    let (symbol, _) = read_padded_string(data, offset, "symbol")?;

    Ok(MetadataAccount {
        key,
        update_authority,
        mint,
        name,
        symbol,
    })
}

/// Read a u32-LE length-prefixed string, trimming trailing nulls.
/// Returns the string and the offset just past it.
fn read_padded_string(
    data: &[u8],
    offset: usize,
    field: &'static str,
) -> Result<(String, usize), DecodeError> {
    let body_start = offset + LENGTH_PREFIX_LEN;
    let prefix = data.get(offset..body_start).ok_or(DecodeError::Truncated {
        field,
        needed: body_start,
        actual: data.len(),
    })?;

    let mut len_bytes = [0u8; LENGTH_PREFIX_LEN];
    len_bytes.copy_from_slice(prefix);
    let len = u32::from_le_bytes(len_bytes) as usize;

    let body_end = body_start
        .checked_add(len)
        .ok_or(DecodeError::Truncated {
            field,
            needed: usize::MAX,
            actual: data.len(),
        })?;
    let body = data.get(body_start..body_end).ok_or(DecodeError::Truncated {
        field,
        needed: body_end,
        actual: data.len(),
    })?;

    let text = std::str::from_utf8(body).map_err(|_| DecodeError::InvalidUtf8 { field })?;
    Ok((text.trim_end_matches('\0').to_string(), body_end))
}

/// Metaplex metadata PDA for a mint: seeds `["metadata", program, mint]`
pub fn metadata_address(mint: &str) -> Result<Pubkey, DecodeError> {
    let program = Pubkey::from_str(METADATA_PROGRAM_ID)
        .map_err(|e| DecodeError::InvalidAddress(e.to_string()))?;
    let mint = Pubkey::from_str(mint).map_err(|e| DecodeError::InvalidAddress(e.to_string()))?;

    let (pda, _bump) =
        Pubkey::find_program_address(&[METADATA_SEED, program.as_ref(), mint.as_ref()], &program);
    Ok(pda)
}
