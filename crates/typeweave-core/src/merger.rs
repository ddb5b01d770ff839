//! Top-level merge run.

use tracing::{debug, info};

use typeweave_store::{Classpath, OutputRoot};

use crate::config::MergeConfig;
use crate::discovery::Discovery;
use crate::markers::{MarkerLoader, MarkerReader};
use crate::merge::MergeEngine;
use crate::report::MergeReport;
use crate::union::UnionStep;
use crate::well_known;

/// Runs discovery, per-target merging and the union step over one classpath.
pub struct MixinMerger {
    config: MergeConfig,
    classpath: Classpath,
    output: OutputRoot,
}

impl MixinMerger {
    pub fn new(config: MergeConfig, classpath: Classpath, output: OutputRoot) -> Self {
        Self {
            config,
            classpath,
            output,
        }
    }

    /// Run the whole merge. Failures of single targets or union types are
    /// recorded on the report; the run itself always completes.
    pub fn merge(&self) -> MergeReport {
        let mut report = MergeReport {
            mapping: self.discover(),
            ..MergeReport::default()
        };
        info!(targets = report.mapping.len(), "discovered mixin targets");

        let engine = MergeEngine::new(self.config.string_types_interface.clone());
        let mut pool = self.classpath.merge_pool();
        for (target, mixins) in &report.mapping {
            debug!(target = %target, mixins = ?mixins, "merging target");
            let target_report = engine.merge_mixins(&mut pool, &self.output, target, mixins);
            report.targets.push(target_report);
        }

        let union = UnionStep::new(&self.classpath, &engine);
        for type_name in &self.config.builtin_unions {
            report.unions.push(union.union(type_name, &self.output));
        }

        let totals = report.totals();
        info!(
            added = totals.added,
            ignored = totals.ignored_duplicates,
            failed = totals.failed,
            errors = report.error_count(),
            "merge finished"
        );
        report
    }

    /// Build the target -> mixins mapping only.
    pub fn discover(&self) -> crate::discovery::MergeMapping {
        let loader = MarkerLoader::new(&self.classpath).with_host_definitions(
            well_known::markers::host_definitions(&self.config.root_marker, &self.config.mixin_marker),
        );
        let reader = MarkerReader::new(loader);
        Discovery::new(&self.classpath, &reader, &self.config).build_mapping(&self.output)
    }
}
