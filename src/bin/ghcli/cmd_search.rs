use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::path::PathBuf;

use crate::args::{GlobalArgs, OutputFormat, SearchArgs};
use crate::reportable::{write_report, Reportable};
use crate::util::{self, Counted};

pub fn run(global_args: &GlobalArgs, args: &SearchArgs) -> Result<()> {
    let client = util::client_builder(global_args)
        .build()
        .context("Failed to initialize GitHub client")?;

    let results = client.search_repositories(&args.query).ok_or_else(|| {
        anyhow!("Search for {:?} produced no result; see the log for details", args.query)
    })?;

    let reporter = SearchReporter {
        results,
        gh_path: client.gh().path().to_owned(),
    };
    write_report(&reporter, &args.output_args)
}

struct SearchReporter {
    results: Value,
    gh_path: PathBuf,
}

impl SearchReporter {
    fn items(&self) -> &[Value] {
        self.results["items"]
            .as_array()
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl Reportable for SearchReporter {
    type Format = OutputFormat;

    fn report<W: std::io::Write>(&self, format: Self::Format, mut writer: W) -> Result<()> {
        match format {
            OutputFormat::Human => {
                for item in self.items() {
                    match item["full_name"].as_str() {
                        Some(full_name) => writeln!(writer, "{full_name}")?,
                        None => writeln!(writer, "{item}")?,
                    }
                }
                if let Some(total) = self.results["total_count"].as_u64() {
                    let total = usize::try_from(total).unwrap_or(usize::MAX);
                    writeln!(writer, "\n{} found", Counted::new(total, "repository", "repositories"))?;
                }
                writeln!(writer, "{}", self.gh_path.display())?;
                Ok(())
            }

            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut writer, &self.results)?;
                writeln!(writer)?;
                Ok(())
            }

            OutputFormat::Jsonl => {
                for item in self.items() {
                    serde_json::to_writer(&mut writer, item)?;
                    writeln!(writer)?;
                }
                Ok(())
            }
        }
    }
}
