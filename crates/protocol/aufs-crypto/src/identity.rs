//! Identity management.
//!
//! Provides Ed25519 keypair generation and principal derivation.
//!
//! A principal is derived from a public key:
//! ```text
//! Principal = H(0x00 || public_key)[0:20]
//! ```
//!
//! A deployed registry gets a deterministic address:
//! ```text
//! ContractAddress = H(0x02 || deployer || label)[0:20]
//! ```
//!
//! Human-readable format: `0x` + lowercase hex(Principal)

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use crate::error::CryptoError;
use crate::{Principal, PrivateKey, PublicKey};

/// Domain separator for key hashing (Ed25519 key type)
const DOMAIN_KEY: u8 = 0x00;

/// Domain separator for contract address derivation
const DOMAIN_CONTRACT: u8 = 0x02;

/// Human-readable principal prefix
const PRINCIPAL_PREFIX: &str = "0x";

/// Generate a new Ed25519 identity (keypair).
///
/// # Example
/// ```
/// use aufs_crypto::generate_identity;
///
/// let (private_key, public_key) = generate_identity();
/// ```
pub fn generate_identity() -> (PrivateKey, PublicKey) {
    let signing_key = SigningKey::generate(&mut OsRng);
    let verifying_key = signing_key.verifying_key();

    (
        PrivateKey::from_signing_key(&signing_key),
        PublicKey(verifying_key.to_bytes()),
    )
}

/// Derive a Principal from a public key.
pub fn principal_from_public_key(public_key: &PublicKey) -> Principal {
    let mut hasher = Sha256::new();
    hasher.update([DOMAIN_KEY]);
    hasher.update(public_key.0);
    truncate(hasher.finalize().into())
}

/// Derive the deterministic address of a contract deployed by `deployer`.
///
/// The label distinguishes several contracts deployed by the same principal
/// (the registry uses its mount point).
///
/// # Example
/// ```
/// use aufs_crypto::{contract_address, Principal};
///
/// let deployer = Principal([7u8; 20]);
/// let a = contract_address(&deployer, "/Web3Tube");
/// assert_eq!(a, contract_address(&deployer, "/Web3Tube"));
/// assert_ne!(a, contract_address(&deployer, "/Other"));
/// ```
pub fn contract_address(deployer: &Principal, label: &str) -> Principal {
    let mut hasher = Sha256::new();
    hasher.update([DOMAIN_CONTRACT]);
    hasher.update(deployer.0);
    hasher.update(label.as_bytes());
    truncate(hasher.finalize().into())
}

fn truncate(hash: [u8; 32]) -> Principal {
    let mut principal = [0u8; 20];
    principal.copy_from_slice(&hash[..20]);
    Principal(principal)
}

/// Convert a Principal to its human-readable string format.
pub fn principal_to_string(principal: &Principal) -> String {
    format!("{}{}", PRINCIPAL_PREFIX, hex::encode(principal.0))
}

/// Parse a human-readable principal string.
///
/// Hex digits are accepted in either case.
///
/// # Errors
/// - `InvalidPrincipalPrefix` if the string doesn't start with `0x`
/// - `InvalidHex` if hex decoding fails
/// - `InvalidLength` if the decoded data isn't 20 bytes
pub fn principal_from_string(s: &str) -> Result<Principal, CryptoError> {
    let digits = s.strip_prefix(PRINCIPAL_PREFIX).ok_or_else(|| {
        let prefix: String = s.chars().take(2).collect();
        CryptoError::InvalidPrincipalPrefix(prefix)
    })?;

    let decoded = hex::decode(digits).map_err(|e| CryptoError::InvalidHex(e.to_string()))?;
    if decoded.len() != 20 {
        return Err(CryptoError::InvalidLength {
            expected: 20,
            actual: decoded.len(),
        });
    }

    let mut principal = [0u8; 20];
    principal.copy_from_slice(&decoded);
    Ok(Principal(principal))
}
