//! A reference incremental engine driven by content hashes.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use kiln_analysis::{ClassInfo, CompileAnalysis, SourceInfo};
use kiln_common::{CompileOrder, ContentHash};
use kiln_diagnostics::DiagnosticSink;
use tracing::{debug, info};

use crate::changes::{hash_sources, ChangeSet};
use crate::classpath::ClasspathIndex;
use crate::compiler::{CompileRequest, CompiledUnit, Compilers, SourceCompiler};
use crate::engine::{EngineInputs, EngineOutput, IncrementalEngine};
use crate::error::EngineError;
use crate::options::CompileOptions;

/// Rounds compiled before falling back to invalidating transitive dependents.
pub const ROUND_LIMIT: usize = 5;

/// Recompiles the minimal set of sources implied by content hashes and the
/// recorded dependency graph.
///
/// A compile proceeds as follows:
///
/// 1. The previous analysis is reused only if its setup is compatible with
///    the current one; otherwise every source is treated as new.
/// 2. Sources are invalidated if they are new or modified, depend on a
///    deleted source, or recorded a classpath dependency whose fingerprint
///    has since changed.
/// 3. Class files of invalidated and deleted sources are removed.
/// 4. Invalidated sources are compiled, in batches following the
///    [`CompileOrder`].
/// 5. Sources depending on a recompiled source whose class APIs changed are
///    compiled in a further round, until no API changes. A source compiled in
///    an earlier round is compiled again if one of its dependencies changes
///    API later on.
/// 6. After [`ROUND_LIMIT`] rounds, every transitive dependent of the
///    sources whose APIs changed is compiled in one last round.
#[derive(Debug, Clone)]
pub struct HashingEngine<C> {
    compiler: C,
}

impl<C: SourceCompiler> HashingEngine<C> {
    /// Creates an engine compiling with `compiler`.
    pub fn new(compiler: C) -> Self {
        Self { compiler }
    }

    /// The wrapped compiler.
    pub fn compiler(&self) -> &C {
        &self.compiler
    }
}

impl<C: SourceCompiler> IncrementalEngine for HashingEngine<C> {
    fn compile(&self, inputs: EngineInputs<'_>) -> Result<EngineOutput, EngineError> {
        let options = inputs.options;
        let hashes = hash_sources(&options.sources)?;

        let mut analysis = match inputs.previous.contents() {
            Some(previous) if previous.setup.is_compatible(inputs.setup) => {
                previous.analysis.clone()
            }
            Some(previous) => {
                info!("compile setup changed, recompiling every source");
                if previous.setup.output_dir == options.output_dir {
                    for source in previous.analysis.sources().keys() {
                        delete_class_files(&previous.analysis, source, &options.output_dir)?;
                    }
                }
                CompileAnalysis::new()
            }
            None => CompileAnalysis::new(),
        };

        let changes = ChangeSet::detect(&hashes, &analysis);
        let mut classpath = ClasspathIndex::new(inputs.lookup, options.external_classpath());
        let mut invalid: BTreeSet<PathBuf> = changes.dirty().cloned().collect();

        for deleted in &changes.deleted_files {
            invalid.extend(
                analysis
                    .dependents_of(deleted)
                    .into_iter()
                    .filter(|p| hashes.contains_key(p)),
            );
        }
        for (path, info) in analysis.sources() {
            if invalid.contains(path) || !hashes.contains_key(path) {
                continue;
            }
            let stale = info
                .binary_deps
                .iter()
                .find(|(class, recorded)| classpath.fingerprint(class) != Some(**recorded));
            if let Some((class, _)) = stale {
                debug!(source = %path.display(), %class, "classpath dependency changed");
                invalid.insert(path.clone());
            }
        }

        debug!(
            new = changes.new_files.len(),
            modified = changes.modified_files.len(),
            deleted = changes.deleted_files.len(),
            invalidated = invalid.len(),
            "initial invalidation"
        );

        for deleted in &changes.deleted_files {
            delete_class_files(&analysis, deleted, &options.output_dir)?;
            analysis.remove_source(deleted);
        }

        let mut recompiled = BTreeSet::new();
        let mut pending = invalid;
        let mut round = 0;
        let mut last_round = false;
        while !pending.is_empty() {
            round += 1;
            info!(round, sources = pending.len(), "compiling");

            let mut previous_api = BTreeMap::new();
            for source in &pending {
                for class in analysis.source(source).map(|s| &s.classes).into_iter().flatten() {
                    if let Some(api) = analysis.api_of(class) {
                        previous_api.insert(class.clone(), (source.clone(), api));
                    }
                }
                delete_class_files(&analysis, source, &options.output_dir)?;
                analysis.remove_source(source);
            }

            let batch: Vec<PathBuf> = pending.iter().cloned().collect();
            let units = self.compile_batches(inputs.compilers, options, &batch, inputs.sink)?;
            record_units(&mut analysis, &batch, units, &hashes, &mut classpath);
            recompiled.extend(batch);

            let changed_sources: BTreeSet<PathBuf> = previous_api
                .into_iter()
                .filter(|(class, (_, api))| analysis.api_of(class) != Some(*api))
                .map(|(_, (source, _))| source)
                .collect();
            if last_round || changed_sources.is_empty() {
                break;
            }
            debug!(sources = changed_sources.len(), "class APIs changed");

            pending = if round < ROUND_LIMIT {
                analysis
                    .sources()
                    .iter()
                    .filter(|(_, info)| !info.source_deps.is_disjoint(&changed_sources))
                    .map(|(path, _)| path.clone())
                    .collect()
            } else {
                info!(round, "round limit reached, compiling transitive dependents");
                last_round = true;
                transitive_dependents(&analysis, &changed_sources)
            };
        }

        Ok(EngineOutput {
            analysis,
            setup: inputs.setup.clone(),
            recompiled: recompiled.into_iter().collect(),
        })
    }
}

impl<C: SourceCompiler> HashingEngine<C> {
    fn compile_batches(
        &self,
        compilers: &Compilers,
        options: &CompileOptions,
        sources: &[PathBuf],
        sink: &DiagnosticSink,
    ) -> Result<Vec<CompiledUnit>, EngineError> {
        let mut units = Vec::new();
        for batch in batches(sources, options.order) {
            if batch.is_empty() {
                continue;
            }
            let output = self.compiler.compile(
                compilers,
                &CompileRequest {
                    sources: &batch,
                    classpath: &options.classpath,
                    output_dir: &options.output_dir,
                    scalac_options: &options.scalac_options,
                    javac_options: &options.javac_options,
                },
            )?;
            sink.emit_all(output.diagnostics);
            if sink.has_errors() {
                return Err(EngineError::CompileFailed {
                    errors: sink.error_count(),
                });
            }
            units.extend(output.units);
        }
        Ok(units)
    }
}

/// Splits `sources` into the batches `order` compiles one after another.
pub fn batches(sources: &[PathBuf], order: CompileOrder) -> Vec<Vec<PathBuf>> {
    let (java, scala): (Vec<PathBuf>, Vec<PathBuf>) =
        sources.iter().cloned().partition(|p| is_java(p));
    match order {
        CompileOrder::Mixed => vec![sources.to_vec()],
        CompileOrder::JavaThenScala => vec![java, scala],
        CompileOrder::ScalaThenJava => vec![scala, java],
    }
}

fn is_java(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "java")
}

/// Every source reaching one of `roots` through recorded source dependencies.
fn transitive_dependents(analysis: &CompileAnalysis, roots: &BTreeSet<PathBuf>) -> BTreeSet<PathBuf> {
    let mut found = BTreeSet::new();
    let mut queue: Vec<PathBuf> = roots.iter().cloned().collect();
    while let Some(path) = queue.pop() {
        for dependent in analysis.dependents_of(&path) {
            if found.insert(dependent.clone()) {
                queue.push(dependent);
            }
        }
    }
    found
}

fn delete_class_files(
    analysis: &CompileAnalysis,
    source: &Path,
    output_dir: &Path,
) -> Result<(), EngineError> {
    for class_file in analysis.class_files(source) {
        let path = output_dir.join(class_file);
        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(EngineError::Io { path, source: e }),
        }
    }
    Ok(())
}

/// Records freshly compiled units, resolving each reference either to a
/// source of this module or to a classpath fingerprint.
fn record_units(
    analysis: &mut CompileAnalysis,
    batch: &[PathBuf],
    units: Vec<CompiledUnit>,
    hashes: &BTreeMap<PathBuf, ContentHash>,
    classpath: &mut ClasspathIndex,
) {
    let mut owners: HashMap<String, PathBuf> = analysis
        .classes()
        .iter()
        .map(|(name, info)| (name.clone(), info.source.clone()))
        .collect();
    for unit in &units {
        for class in &unit.classes {
            owners.insert(class.name.clone(), unit.source.clone());
        }
    }

    let mut compiled = BTreeSet::new();
    for unit in units {
        let Some(hash) = hashes.get(&unit.source).copied() else {
            continue;
        };
        let mut info = SourceInfo::new(hash);
        for reference in &unit.references {
            match owners.get(reference) {
                Some(owner) if *owner == unit.source => {}
                Some(owner) => {
                    info.source_deps.insert(owner.clone());
                }
                None => {
                    if let Some(fingerprint) = classpath.fingerprint(reference) {
                        info.binary_deps.insert(reference.clone(), fingerprint);
                    }
                }
            }
        }
        let classes = unit
            .classes
            .into_iter()
            .map(|class| {
                let info = ClassInfo {
                    source: unit.source.clone(),
                    class_file: class.class_file,
                    api_hash: class.api_hash,
                };
                (class.name, info)
            })
            .collect();
        compiled.insert(unit.source.clone());
        analysis.record(unit.source, info, classes);
    }

    for source in batch {
        if !compiled.contains(source) {
            if let Some(hash) = hashes.get(source) {
                analysis.record(source.clone(), SourceInfo::new(*hash), Vec::new());
            }
        }
    }
}
