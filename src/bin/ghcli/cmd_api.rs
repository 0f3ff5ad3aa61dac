use anyhow::{bail, Context, Result};
use serde_json::Value;

use crate::args::{ApiCommand, GlobalArgs};
use crate::util;

pub fn run(global_args: &GlobalArgs, command: &ApiCommand) -> Result<()> {
    let gh = util::client_builder(global_args)
        .build_gh()
        .context("Failed to locate the GitHub CLI")?;

    let (path, response) = match command {
        ApiCommand::Get(args) => (&args.path, gh.get(&args.path)),
        ApiCommand::Post(args) => (&args.path, gh.post(&args.path, &args.args)),
    };

    match response {
        Some(value) => print_json(&value),
        None => bail!("Request to {path} produced no result; see the log for details"),
    }
}

fn print_json(value: &Value) -> Result<()> {
    use std::io::Write;

    let mut writer = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    Ok(())
}
