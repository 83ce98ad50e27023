//! Inspect the registry or a single path.

use aufs_crypto::Principal;
use aufs_store::RegistryStore;

use crate::context::RegistryContext;
use crate::error::CliResult;
use crate::output::{OutputFormat, PathOutput, RegistryOutput, Render};

/// Execute the inspect command.
///
/// Without a path, dumps the deployment and every stored record. With a
/// path, shows who sells it, at what price, its fingerprint and optionally
/// `principal`'s effective grant.
pub fn inspect(
    ctx: &RegistryContext,
    format: OutputFormat,
    path: Option<&str>,
    principal: Option<Principal>,
) -> CliResult<String> {
    let host = &ctx.host;

    let Some(path) = path else {
        let store = host.store();
        let registry = host.registry();
        let output = RegistryOutput {
            owner: registry.owner(),
            registry: registry.address(),
            scheme: registry.scheme().to_string(),
            mount: registry.mount().to_string(),
            default_price: host.default_price()?,
            total_supply: host.total_supply()?,
            total_taxes: host.total_taxes()?,
            delegations: store.edges()?,
            authorizations: store.grants()?,
            uris: store.uris()?,
        };
        return Ok(output.render(format));
    };

    let path_owner = host.path_owner(path)?;
    let authorization = match principal {
        Some(p) => host.effective_authorization(path, &p)?,
        None => None,
    };
    let output = PathOutput {
        path: host.resolve_path(path)?.to_string(),
        path_owner,
        price: host.price(&path_owner)?,
        fingerprint: host.uri(path)?.map(|record| record.fingerprint),
        principal,
        authorization,
        now: host.now(),
    };
    Ok(output.render(format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{alice, bob, deployed, open_as, owner};
    use aufs_types::PathAttr;
    use tempfile::TempDir;

    #[test]
    fn test_inspect_registry() {
        let temp_dir = TempDir::new().unwrap();
        let config = deployed(&temp_dir);
        let mut ctx = open_as(&config, owner());
        ctx.host
            .delegate(owner(), bob(), "/dir1", PathAttr::CanAuthorize, false)
            .unwrap();

        let output = inspect(&ctx, OutputFormat::Json, None, None).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["owner"], owner().to_string());
        assert_eq!(json["mount"], "/Web3Tube");
        assert_eq!(json["delegations"].as_array().unwrap().len(), 1);

        let human = inspect(&ctx, OutputFormat::Human, None, None).unwrap();
        assert!(human.contains("Delegations"));
        assert!(human.contains("/Web3Tube/dir1"));
    }

    #[test]
    fn test_inspect_path_after_purchase() {
        let temp_dir = TempDir::new().unwrap();
        let config = deployed(&temp_dir);
        let mut ctx = open_as(&config, owner());
        ctx.host
            .delegate(owner(), bob(), "/dir1", PathAttr::CanAuthorize, false)
            .unwrap();
        ctx.host
            .buy(alice(), "/dir1/movie1.mp4", alice(), 60, 100)
            .unwrap();

        let output = inspect(
            &ctx,
            OutputFormat::Json,
            Some("/dir1/movie1.mp4"),
            Some(alice()),
        )
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["path_owner"], bob().to_string());
        assert_eq!(json["price"], 100);
        assert!(json["fingerprint"].is_null());
        assert_eq!(json["authorization"]["path"], "/Web3Tube/dir1/movie1.mp4");
    }
}
