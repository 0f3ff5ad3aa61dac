use anyhow::{Context, Result};
use console::style;
use serde::Serialize;

use crate::args::{GlobalArgs, OutputFormat, ReposCommand, ReposListArgs, ReposPermissionsArgs};
use crate::reportable::{write_report, Reportable};
use crate::util;

pub fn run(global_args: &GlobalArgs, command: &ReposCommand) -> Result<()> {
    match command {
        ReposCommand::List(args) => list_repos(global_args, args),
        ReposCommand::Permissions(args) => list_permissions(global_args, args),
    }
}

fn list_repos(global_args: &GlobalArgs, args: &ReposListArgs) -> Result<()> {
    let client = util::client_builder(global_args)
        .build()
        .context("Failed to initialize GitHub client")?;
    let names = client.repos().iter().map(|r| r.full_name.clone()).collect();
    write_report(&RepoReporter(names), &args.output_args)
}

fn list_permissions(global_args: &GlobalArgs, args: &ReposPermissionsArgs) -> Result<()> {
    let client = util::client_builder(global_args)
        .build()
        .context("Failed to initialize GitHub client")?;
    let entries = client
        .repo_perm_index()
        .iter()
        .filter(|(_, perms)| match &args.has {
            Some(wanted) => perms.iter().any(|p| p == wanted),
            None => true,
        })
        .map(|(full_name, permissions)| PermissionEntry {
            full_name: full_name.to_string(),
            permissions: permissions.to_vec(),
        })
        .collect();
    write_report(&PermissionReporter(entries), &args.output_args)
}

struct RepoReporter(Vec<String>);

impl Reportable for RepoReporter {
    type Format = OutputFormat;

    fn report<W: std::io::Write>(&self, format: Self::Format, mut writer: W) -> Result<()> {
        let names = &self.0;
        match format {
            OutputFormat::Human => {
                for name in names {
                    writeln!(writer, "{name}")?;
                }
                Ok(())
            }

            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut writer, names)?;
                writeln!(writer)?;
                Ok(())
            }

            OutputFormat::Jsonl => {
                for name in names {
                    serde_json::to_writer(&mut writer, name)?;
                    writeln!(writer)?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Serialize)]
struct PermissionEntry {
    full_name: String,
    permissions: Vec<String>,
}

struct PermissionReporter(Vec<PermissionEntry>);

impl Reportable for PermissionReporter {
    type Format = OutputFormat;

    fn report<W: std::io::Write>(&self, format: Self::Format, mut writer: W) -> Result<()> {
        let entries = &self.0;
        match format {
            OutputFormat::Human => {
                for entry in entries {
                    writeln!(
                        writer,
                        "{}: {}",
                        style(&entry.full_name).bold(),
                        entry.permissions.join(", ")
                    )?;
                }
                Ok(())
            }

            // the same shape as the permission index: full name -> permissions
            OutputFormat::Json => {
                let index: serde_json::Map<String, serde_json::Value> = entries
                    .iter()
                    .map(|e| (e.full_name.clone(), e.permissions.clone().into()))
                    .collect();
                serde_json::to_writer_pretty(&mut writer, &index)?;
                writeln!(writer)?;
                Ok(())
            }

            OutputFormat::Jsonl => {
                for entry in entries {
                    serde_json::to_writer(&mut writer, entry)?;
                    writeln!(writer)?;
                }
                Ok(())
            }
        }
    }
}
