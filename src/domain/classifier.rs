//! Security Classifier
//!
//! The one policy decision in the crate. Pure function of a decoded record:
//!
//! | Owner program | Verdict                                                    |
//! |---------------|------------------------------------------------------------|
//! | System/other  | `NOT_A_TOKEN`                                              |
//! | SPL Token     | `PASSED` iff no freeze authority                           |
//! | Token-2022    | `FAILED` if freeze authority, permanent delegate,          |
//! |               | confidential-transfer authority, transfer hook or a        |
//! |               | non-zero transfer fee is present; `PASSED` otherwise       |

use super::token::{ExtensionSet, OwnerProgram, SecurityReview, TokenRecord};

/// Classify a record against the custody policy
pub fn classify(record: &TokenRecord) -> SecurityReview {
    classify_fields(
        &record.owner_program,
        record.freeze_authority.is_some(),
        record.extensions.as_ref(),
    )
}

/// Same rule table over the individual inputs
pub fn classify_fields(
    owner: &OwnerProgram,
    has_freeze_authority: bool,
    extensions: Option<&ExtensionSet>,
) -> SecurityReview {
    match owner {
        OwnerProgram::System | OwnerProgram::Other(_) => SecurityReview::NotAToken,
        OwnerProgram::SplToken => verdict(has_freeze_authority),
        OwnerProgram::Token2022 => {
            let extension_risk = extensions.map_or(false, ExtensionSet::has_risk);
            verdict(has_freeze_authority || extension_risk)
        }
    }
}

fn verdict(risky: bool) -> SecurityReview {
    if risky {
        SecurityReview::Failed
    } else {
        SecurityReview::Passed
    }
}
