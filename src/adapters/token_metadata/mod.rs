//! Token Account Adapter
//!
//! Reads the data the classifier needs from Solana RPC:
//! - primary mint account (`jsonParsed`): owner, freeze authority, Token-2022 extensions
//! - Metaplex metadata account (`base64`): fallback name and symbol
//!
//! # Example
//!
//! ```rust,ignore
//! use mint_sentinel::adapters::token_metadata::{decode_primary_account, TokenAccountClient};
//!
//! let client = TokenAccountClient::new(retry_controller);
//! if let Some(account) = client.fetch_account(mint).await? {
//!     let decoded = decode_primary_account(&account);
//!     println!("owner: {}", decoded.owner);
//! }
//! ```

mod client;
mod decoder;
mod types;

pub use client::{TokenAccountClient, DEFAULT_COMMITMENT};
pub use decoder::{
    decode_metadata_account, decode_metadata_base64, decode_primary_account, extension_set,
    metadata_address, DecodeError, DecodedAccount, MetadataAccount,
};
pub use types::{AccountData, AccountInfoValue, ExtensionEntry, MintExtension, MintInfo};
