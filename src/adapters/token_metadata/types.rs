//! Token Account Wire Types
//!
//! Shapes of `getAccountInfo` results in `jsonParsed` and `base64`
//! encodings, and the typed Token-2022 extension states this crate reads.
//! Every field the RPC may omit is optional.

use serde::Deserialize;
use serde_json::Value;

/// `result` member of a `getAccountInfo` response
#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfoResult {
    #[serde(default)]
    pub value: Option<AccountInfoValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfoValue {
    pub owner: String,
    #[serde(default)]
    pub data: AccountData,
    #[serde(default)]
    pub lamports: u64,
    #[serde(default)]
    pub executable: bool,
}

/// Account payload: parsed JSON, `[data, encoding]` pair, or anything else
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AccountData {
    Parsed(ParsedAccountData),
    Encoded(Vec<String>),
    Other(Value),
}

impl Default for AccountData {
    fn default() -> Self {
        AccountData::Other(Value::Null)
    }
}

impl AccountData {
    /// Base64 payload of an `["<data>", "base64"]` pair
    pub fn base64_payload(&self) -> Option<&str> {
        match self {
            AccountData::Encoded(parts) if parts.get(1).map(String::as_str) == Some("base64") => {
                parts.first().map(String::as_str)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParsedAccountData {
    pub parsed: ParsedPayload,
    #[serde(default)]
    pub program: String,
    #[serde(default)]
    pub space: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParsedPayload {
    #[serde(default)]
    pub info: MintInfo,
    #[serde(rename = "type", default)]
    pub account_type: String,
}

/// Mint fields from the SPL Token / Token-2022 parsers
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintInfo {
    #[serde(default)]
    pub mint_authority: Option<String>,
    #[serde(default)]
    pub freeze_authority: Option<String>,
    #[serde(default)]
    pub supply: Option<String>,
    #[serde(default)]
    pub decimals: Option<u8>,
    #[serde(default)]
    pub is_initialized: Option<bool>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub extensions: Vec<ExtensionEntry>,
}

/// One raw `{ "extension": tag, "state": {...} }` entry
#[derive(Debug, Clone, Deserialize)]
pub struct ExtensionEntry {
    pub extension: String,
    #[serde(default)]
    pub state: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PermanentDelegateState {
    #[serde(default)]
    pub delegate: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferFeeConfigState {
    #[serde(default)]
    pub newer_transfer_fee: Option<TransferFee>,
    #[serde(default)]
    pub older_transfer_fee: Option<TransferFee>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferFee {
    #[serde(default)]
    pub epoch: Option<u64>,
    #[serde(default)]
    pub transfer_fee_basis_points: Option<u16>,
}

/// State shared by `transferHook` and `confidentialTransferMint`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorityState {
    #[serde(default)]
    pub authority: Option<String>,
    #[serde(default)]
    pub program_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadataState {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub update_authority: Option<String>,
}

/// Token-2022 extensions with a typed state.
///
/// Tags this crate does not read land in `Other` and are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintExtension {
    PermanentDelegate(PermanentDelegateState),
    TransferFeeConfig(TransferFeeConfigState),
    TransferHook(AuthorityState),
    ConfidentialTransferMint(AuthorityState),
    TokenMetadata(TokenMetadataState),
    Other(String),
}

impl MintExtension {
    /// Type the state of a raw entry. `Err` when a known tag has a malformed state.
    pub fn from_entry(entry: &ExtensionEntry) -> Result<Self, serde_json::Error> {
        let state = entry.state.clone();
        let extension = match entry.extension.as_str() {
            "permanentDelegate" => MintExtension::PermanentDelegate(serde_json::from_value(state)?),
            "transferFeeConfig" => MintExtension::TransferFeeConfig(serde_json::from_value(state)?),
            "transferHook" => MintExtension::TransferHook(serde_json::from_value(state)?),
            "confidentialTransferMint" => {
                MintExtension::ConfidentialTransferMint(serde_json::from_value(state)?)
            }
            "tokenMetadata" => MintExtension::TokenMetadata(serde_json::from_value(state)?),
            other => MintExtension::Other(other.to_string()),
        };
        Ok(extension)
    }

    /// Tag as reported by the RPC parser
    pub fn name(&self) -> &str {
        match self {
            MintExtension::PermanentDelegate(_) => "permanentDelegate",
            MintExtension::TransferFeeConfig(_) => "transferFeeConfig",
            MintExtension::TransferHook(_) => "transferHook",
            MintExtension::ConfidentialTransferMint(_) => "confidentialTransferMint",
            MintExtension::TokenMetadata(_) => "tokenMetadata",
            MintExtension::Other(tag) => tag,
        }
    }
}
