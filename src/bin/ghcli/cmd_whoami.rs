use anyhow::{Context, Result};

use ghcli::github::{Error, Identity};

use crate::args::GlobalArgs;
use crate::util;

pub fn run(global_args: &GlobalArgs) -> Result<()> {
    let gh = util::client_builder(global_args)
        .build_gh()
        .context("Failed to locate the GitHub CLI")?;
    let identity = gh
        .try_get("/user")
        .map_err(Error::from)
        .and_then(Identity::from_value)
        .context("Failed to fetch the authenticated identity")?;
    let login = identity.login().ok_or(Error::MissingLogin)?;
    println!("{login}");
    Ok(())
}
