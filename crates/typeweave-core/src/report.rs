//! Run report: what was discovered, merged and written.

use serde::Serialize;
use std::path::PathBuf;

use crate::discovery::MergeMapping;

/// Member accounting for one merge (target, or one union type).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    /// Members (and nested types) copied into the target
    pub added: usize,
    /// Members skipped because the target already declares the name
    pub ignored_duplicates: usize,
    /// Members whose copy raised an unexpected error
    pub failed: usize,
}

impl MergeOutcome {
    pub fn absorb(&mut self, other: &MergeOutcome) {
        self.added += other.added;
        self.ignored_duplicates += other.ignored_duplicates;
        self.failed += other.failed;
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetReport {
    pub target: String,
    pub mixins: Vec<String>,
    pub outcome: MergeOutcome,
    /// Digest of the target before any mixin was applied
    pub digest_before: Option<String>,
    pub digest_after: Option<String>,
    /// File the merged outermost type was written to
    pub written: Option<PathBuf>,
    pub error: Option<String>,
}

impl TargetReport {
    pub fn new(target: &str, mixins: &[String]) -> Self {
        Self {
            target: target.to_string(),
            mixins: mixins.to_vec(),
            outcome: MergeOutcome::default(),
            digest_before: None,
            digest_after: None,
            written: None,
            error: None,
        }
    }

    /// True when the merge did not change the target.
    pub fn unchanged(&self) -> bool {
        self.digest_before.is_some() && self.digest_before == self.digest_after
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UnionReport {
    pub type_name: String,
    /// Modules (classpath labels) that define a variant, in classpath order
    pub variants: Vec<String>,
    pub outcome: MergeOutcome,
    pub written: Option<PathBuf>,
    pub error: Option<String>,
}

impl UnionReport {
    pub fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            variants: Vec::new(),
            outcome: MergeOutcome::default(),
            written: None,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeReport {
    pub mapping: MergeMapping,
    pub targets: Vec<TargetReport>,
    pub unions: Vec<UnionReport>,
}

impl MergeReport {
    /// Sum of every target and union outcome.
    pub fn totals(&self) -> MergeOutcome {
        let mut totals = MergeOutcome::default();
        for target in &self.targets {
            totals.absorb(&target.outcome);
        }
        for union in &self.unions {
            totals.absorb(&union.outcome);
        }
        totals
    }

    /// Targets and union types whose processing failed.
    pub fn error_count(&self) -> usize {
        self.targets.iter().filter(|t| t.error.is_some()).count()
            + self.unions.iter().filter(|u| u.error.is_some()).count()
    }

    pub fn target(&self, name: &str) -> Option<&TargetReport> {
        self.targets.iter().find(|t| t.target == name)
    }

    pub fn to_json_pretty(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_and_errors() {
        let mut report = MergeReport::default();
        let mut t = TargetReport::new("def.lib.T", &["def.lib.M".to_string()]);
        t.outcome.added = 2;
        t.outcome.ignored_duplicates = 1;
        report.targets.push(t);
        let mut u = UnionReport::new("typeweave.util.StringTypes");
        u.outcome.added = 3;
        u.error = Some("boom".into());
        report.unions.push(u);

        let totals = report.totals();
        assert_eq!(totals.added, 5);
        assert_eq!(totals.ignored_duplicates, 1);
        assert_eq!(report.error_count(), 1);
        assert!(report.to_json_pretty().unwrap().contains("\"ignored_duplicates\": 1"));
    }
}
