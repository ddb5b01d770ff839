use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use typeweave::descriptor::LibraryDescriptor;

#[derive(Parser, Debug)]
#[command(about = "Print the library descriptor of a module archive")]
pub struct DescribeCmd {
    /// Module archive
    pub archive: PathBuf,

    /// Group id prefix preceding the model version
    #[arg(long, default_value = typeweave::descriptor::DEFAULT_GROUP_PREFIX)]
    pub group_prefix: String,
}

impl DescribeCmd {
    pub fn execute(&self, json_output: bool) -> Result<()> {
        let archive = typeweave::store::ModuleArchive::read(&self.archive)?;
        let descriptor = LibraryDescriptor::from_archive_with_prefix(&archive, &self.group_prefix)
            .with_context(|| format!("describe {}", self.archive.display()))?;

        if json_output {
            println!(
                "{}",
                serde_json::to_string_pretty(&descriptor).context("serialize descriptor")?
            );
        } else {
            println!("{}", descriptor);
            println!("  name:          {}", descriptor.name);
            println!("  version:       {}", descriptor.version);
            println!("  model version: {}", descriptor.model_version);
            match descriptor.last_update() {
                Some(t) => println!("  updated:       {}", t.to_rfc3339()),
                None => println!("  updated:       {}", descriptor.last_update_timestamp),
            }
        }
        Ok(())
    }
}
