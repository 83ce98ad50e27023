//! Generate an identity.

use aufs_crypto::{generate_identity, principal_from_public_key};

use crate::error::CliResult;
use crate::output::{KeygenOutput, OutputFormat, Render};

/// Execute the keygen command.
pub fn keygen(format: OutputFormat) -> CliResult<String> {
    let (private_key, public_key) = generate_identity();
    let principal = principal_from_public_key(&public_key);

    let output = KeygenOutput {
        principal,
        public_key: format!("0x{}", hex::encode(public_key.as_bytes())),
        private_key: format!("0x{}", hex::encode(private_key.as_bytes())),
    };

    Ok(output.render(format))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keygen_json() {
        let output = keygen(OutputFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        let principal = json["principal"].as_str().unwrap();
        assert_eq!(principal.len(), 42);
        assert!(principal.parse::<aufs_crypto::Principal>().is_ok());
        assert_eq!(json["public_key"].as_str().unwrap().len(), 66);
    }

    #[test]
    fn test_keygen_human() {
        let output = keygen(OutputFormat::Human).unwrap();
        assert!(output.contains("Principal"));
        assert!(output.contains("secret"));
    }
}
