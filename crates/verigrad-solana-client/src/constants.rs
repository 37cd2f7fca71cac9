//! Constants shared with the deployed programs.
//!
//! Keep these stable because they affect PDA derivation and instruction
//! encoding.

/// PDA seed prefix used by the Token Metadata program.
pub const SEED_METADATA: &[u8] = b"metadata";

/// `CreateMetadataAccountV3` instruction tag of the Token Metadata program.
pub const CREATE_METADATA_ACCOUNT_V3: u8 = 33;

/// On-chain limits enforced by the Token Metadata program.
pub const MAX_NAME_LENGTH: usize = 32;
pub const MAX_SYMBOL_LENGTH: usize = 10;
pub const MAX_URI_LENGTH: usize = 200;

/// Largest serialized transaction accepted by the cluster.
pub const MAX_ENVELOPE_BYTES: usize = solana_sdk::packet::PACKET_DATA_SIZE;

/// Anchor instruction name of the VeriGrad issue call.
pub const ISSUE_DIPLOMA_IX: &str = "issue_diploma";

/// Anchor account name of VeriGrad diploma records.
pub const DIPLOMA_ACCOUNT: &str = "Diploma";

/// Space the program allocates per `Diploma` account:
/// discriminator, issuer, student, two strings, year, timestamp.
pub const DIPLOMA_ACCOUNT_SPACE: usize = 8 + 32 + 32 + 64 + 64 + 2 + 8;

/// Bytes reserved for `studentName` and `degree`, length prefixes included.
pub const DIPLOMA_STRINGS_SPACE: usize = 64 + 64;

/// Byte offsets of the key fields inside a `Diploma` account.
pub const DIPLOMA_ISSUER_OFFSET: usize = 8;
pub const DIPLOMA_STUDENT_OFFSET: usize = 40;
