use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

use typeweave::engine::{MergeConfig, MergeReport, MixinMerger};
use typeweave::store::{Classpath, OutputRoot};
use typeweave::types::env_utils::env_bool;

#[derive(Parser, Debug)]
#[command(about = "Merge mixins into their targets and union builtin utility types")]
pub struct MergeCmd {
    /// Output root holding the compiled namespace tree; merged types are written here
    #[arg(long)]
    pub out: PathBuf,

    /// Library module (directory or archive); repeat in classpath order
    #[arg(long = "classpath", value_name = "ENTRY")]
    pub classpath: Vec<PathBuf>,

    /// JSON config file (missing keys keep their defaults)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Namespace to scan (overrides config and environment)
    #[arg(long)]
    pub namespace: Option<String>,

    /// Exit with an error if any target or union type failed
    /// (also enabled by TYPEWEAVE_STRICT=1)
    #[arg(long)]
    pub strict: bool,
}

impl MergeCmd {
    fn load_config(&self) -> Result<MergeConfig> {
        let mut config = match &self.config {
            Some(path) => MergeConfig::from_json_file(path)?.with_env_overrides(),
            None => MergeConfig::from_env(),
        };
        if let Some(namespace) = &self.namespace {
            config.namespace = namespace.clone();
        }
        Ok(config)
    }

    /// Output root first (its own compiled types win), then the given entries.
    fn classpath_entries(&self) -> Vec<PathBuf> {
        let mut entries = vec![self.out.clone()];
        for entry in &self.classpath {
            if entry != &self.out {
                entries.push(entry.clone());
            }
        }
        entries
    }

    pub fn execute(&self, json_output: bool) -> Result<()> {
        if !self.out.is_dir() {
            return Err(anyhow!("output root {} is not a directory", self.out.display()));
        }
        let config = self.load_config()?;
        let entries = self.classpath_entries();
        let requested = entries.len();
        info!(
            out = %self.out.display(),
            namespace = %config.namespace,
            entries = requested,
            "starting merge"
        );
        let classpath = Classpath::open(entries);
        if classpath.len() < requested {
            warn!(
                opened = classpath.len(),
                "some classpath entries could not be opened and were skipped"
            );
        }
        let merger = MixinMerger::new(config, classpath, OutputRoot::new(&self.out));
        let report = merger.merge();

        if json_output {
            println!("{}", report.to_json_pretty().context("serialize merge report")?);
        } else {
            print_report(&report);
        }

        let strict = self.strict || env_bool("TYPEWEAVE_STRICT");
        if strict && report.error_count() > 0 {
            return Err(anyhow!("{} targets or union types failed", report.error_count()));
        }
        Ok(())
    }
}

fn print_report(report: &MergeReport) {
    println!("typeweave merge");
    for target in &report.targets {
        let status = match (&target.error, &target.written) {
            (Some(_), _) => "FAIL",
            (None, Some(_)) => "OK",
            (None, None) => "SKIP",
        };
        println!(
            "[{}] {} <- {} (added {}, ignored {}, failed {})",
            status,
            target.target,
            target.mixins.join(", "),
            target.outcome.added,
            target.outcome.ignored_duplicates,
            target.outcome.failed
        );
        if let Some(error) = &target.error {
            println!("      error: {}", error);
        }
    }
    for union in &report.unions {
        println!(
            "[UNION] {}: {} variants (added {}, ignored {})",
            union.type_name,
            union.variants.len(),
            union.outcome.added,
            union.outcome.ignored_duplicates
        );
        if let Some(error) = &union.error {
            println!("      error: {}", error);
        }
    }

    let totals = report.totals();
    println!();
    println!(
        "Summary: {} targets, {} added, {} ignored, {} errors",
        report.targets.len(),
        totals.added,
        totals.ignored_duplicates,
        report.error_count()
    );
}
