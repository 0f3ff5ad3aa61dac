use anyhow::{Context, Result};

use crate::args::GlobalArgs;
use crate::util;

pub fn run(global_args: &GlobalArgs) -> Result<()> {
    let gh = util::client_builder(global_args)
        .build_gh()
        .context("Failed to locate the GitHub CLI")?;
    println!("{}", gh.path().display());
    Ok(())
}
