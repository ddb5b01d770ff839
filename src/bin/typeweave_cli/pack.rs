use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;

use typeweave::store::{ModuleArchive, MANIFEST_PATH};

const DEFAULT_MANIFEST: &[u8] = b"Manifest-Version: 1.0\n";

#[derive(Parser, Debug)]
#[command(about = "Pack a compiled module directory into a module archive")]
pub struct PackCmd {
    /// Module root directory
    pub dir: PathBuf,

    /// Archive file to write
    pub archive: PathBuf,

    /// Manifest modification time in ms since the epoch (adds a manifest if missing)
    #[arg(long)]
    pub manifest_time: Option<i64>,
}

impl PackCmd {
    pub fn execute(&self, json_output: bool) -> Result<()> {
        if !self.dir.is_dir() {
            return Err(anyhow!("{} is not a directory", self.dir.display()));
        }
        let mut archive = ModuleArchive::from_dir(&self.dir)?;
        if let Some(ms) = self.manifest_time {
            let bytes = archive
                .entry(MANIFEST_PATH)
                .map(|e| e.bytes.clone())
                .unwrap_or_else(|| DEFAULT_MANIFEST.to_vec());
            archive.add(MANIFEST_PATH, ms, bytes);
        }
        archive
            .write(&self.archive)
            .with_context(|| format!("write archive {}", self.archive.display()))?;

        if json_output {
            let paths: Vec<&str> = archive.entries.iter().map(|e| e.path.as_str()).collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "archive": self.archive.display().to_string(),
                    "entries": paths,
                }))?
            );
        } else {
            println!(
                "Packed {} entries into {}",
                archive.entries.len(),
                self.archive.display()
            );
        }
        Ok(())
    }
}
