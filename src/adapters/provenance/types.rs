//! Signature history and transaction wire types

use serde::Deserialize;
use serde_json::Value;

/// One entry of a `getSignaturesForAddress` page
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureInfo {
    pub signature: String,
    #[serde(default)]
    pub slot: u64,
    #[serde(default)]
    pub err: Option<Value>,
    #[serde(default)]
    pub block_time: Option<i64>,
    #[serde(default)]
    pub confirmation_status: Option<String>,
}

/// `getTransaction` result (`jsonParsed`). Only `meta` is read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionResult {
    #[serde(default)]
    pub slot: u64,
    #[serde(default)]
    pub meta: Option<TransactionMeta>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMeta {
    #[serde(default)]
    pub err: Option<Value>,
    /// `null` when inner instruction recording was disabled
    #[serde(default)]
    pub inner_instructions: Option<Vec<InnerInstructionSet>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InnerInstructionSet {
    #[serde(default)]
    pub index: u8,
    #[serde(default)]
    pub instructions: Vec<InstructionEntry>,
}

/// Inner instruction; `parsed` is present only for programs the node can parse
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionEntry {
    #[serde(default)]
    pub parsed: Option<ParsedInstruction>,
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default)]
    pub program_id: Option<String>,
}

/// Parsed form: `{type, info}` for the system/token programs, a bare
/// value (e.g. a memo string) otherwise
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ParsedInstruction {
    Typed {
        #[serde(rename = "type")]
        kind: String,
        #[serde(default)]
        info: Value,
    },
    Raw(Value),
}

/// `info` of a system-program `createAccount`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountInfo {
    #[serde(default)]
    pub new_account: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

impl InstructionEntry {
    /// Owner declared by a `createAccount` instruction
    pub fn created_account_owner(&self) -> Option<String> {
        match &self.parsed {
            Some(ParsedInstruction::Typed { kind, info }) if kind == "createAccount" => {
                serde_json::from_value::<CreateAccountInfo>(info.clone())
                    .ok()
                    .and_then(|info| info.owner)
            }
            _ => None,
        }
    }
}

impl TransactionResult {
    /// Every inner instruction across all outer instructions
    pub fn inner_instructions(&self) -> impl Iterator<Item = &InstructionEntry> {
        self.meta
            .iter()
            .filter_map(|meta| meta.inner_instructions.as_ref())
            .flatten()
            .flat_map(|set| set.instructions.iter())
    }
}
