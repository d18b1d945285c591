//! Fixtures shared by the orchestration tests.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use kiln_analysis::{AnalysisLayout, AnalysisStore};
use kiln_common::ContentHash;
use kiln_compile::CompileOrchestrator;
use kiln_config::KilnConfig;
use kiln_diagnostics::{Diagnostic, Position};
use kiln_incremental::{
    CompileRequest, CompiledClass, CompiledUnit, CompilerOutput, Compilers, EngineError,
    HashingEngine, IncrementalEngine, SourceCompiler,
};
use kiln_toolchain::{LoadingContextRegistry, Toolchain, ToolchainProvisioner, ToolchainSpec};
use parking_lot::Mutex;

/// A compiler for a line-based toy language:
///
/// ```text
/// class a.A api=1        defines class a.A with public API "1"
/// ref a.B                references class a.B
/// error some message     reports an error on that line
/// warning some message   reports a warning on that line
/// ```
#[derive(Default)]
pub struct ScriptedCompiler {
    batches: Mutex<Vec<Vec<PathBuf>>>,
    classpaths: Mutex<Vec<Vec<PathBuf>>>,
}

impl ScriptedCompiler {
    pub fn batches(&self) -> Vec<Vec<PathBuf>> {
        self.batches.lock().clone()
    }

    pub fn classpaths(&self) -> Vec<Vec<PathBuf>> {
        self.classpaths.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.batches.lock().len()
    }
}

impl SourceCompiler for ScriptedCompiler {
    fn compile(
        &self,
        _compilers: &Compilers,
        request: &CompileRequest<'_>,
    ) -> Result<CompilerOutput, EngineError> {
        self.batches.lock().push(request.sources.to_vec());
        self.classpaths.lock().push(request.classpath.to_vec());
        let mut output = CompilerOutput::default();
        for source in request.sources {
            let text = std::fs::read_to_string(source).map_err(|e| EngineError::Io {
                path: source.clone(),
                source: e,
            })?;
            let mut unit = CompiledUnit {
                source: source.clone(),
                classes: Vec::new(),
                references: BTreeSet::new(),
            };
            for (index, line) in text.lines().enumerate() {
                let position = Position::new(source.clone(), index as u32 + 1, 1)
                    .with_line_content(line);
                let mut words = line.split_whitespace();
                match words.next() {
                    Some("class") => {
                        let name = words.next().unwrap_or_default().to_string();
                        let api = words.next().unwrap_or("api=");
                        let class_file =
                            PathBuf::from(format!("{}.class", name.replace('.', "/")));
                        let path = request.output_dir.join(&class_file);
                        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
                        std::fs::write(&path, line).unwrap();
                        unit.classes.push(CompiledClass {
                            name,
                            class_file,
                            api_hash: ContentHash::from_bytes(api.as_bytes()),
                        });
                    }
                    Some("ref") => {
                        unit.references
                            .insert(words.next().unwrap_or_default().to_string());
                    }
                    Some("error") => output.diagnostics.push(Diagnostic::error(
                        words.collect::<Vec<_>>().join(" "),
                        position,
                    )),
                    Some("warning") => output.diagnostics.push(Diagnostic::warning(
                        words.collect::<Vec<_>>().join(" "),
                        position,
                    )),
                    _ => {}
                }
            }
            output.units.push(unit);
        }
        Ok(output)
    }
}

pub fn write_jar(path: &Path, entries: &[&str]) {
    let mut jar = zip::ZipWriter::new(std::fs::File::create(path).unwrap());
    for entry in entries {
        jar.start_file(entry.to_string(), zip::write::SimpleFileOptions::default())
            .unwrap();
        jar.write_all(b"\xca\xfe\xba\xbe").unwrap();
    }
    jar.finish().unwrap();
}

/// Writes a fake compiler distribution under `dir` and describes it.
pub fn toolchain_spec(dir: &Path) -> ToolchainSpec {
    std::fs::create_dir_all(dir).unwrap();
    let library_jar = dir.join("scala-library-2.13.12.jar");
    let compiler_jar = dir.join("scala-compiler-2.13.12.jar");
    write_jar(&library_jar, &["scala/Predef.class", "scala/Option.class"]);
    write_jar(&compiler_jar, &["scala/tools/nsc/Main.class"]);
    ToolchainSpec {
        version: "2.13.12".to_string(),
        library_jar,
        compiler_jar,
        reflect_jar: None,
        extra_jars: Vec::new(),
    }
}

pub fn toolchain(dir: &Path) -> Toolchain {
    ToolchainProvisioner::new(Arc::new(LoadingContextRegistry::new()))
        .instance(&toolchain_spec(dir))
        .unwrap()
}

/// One module of a multi-module build: `<root>/src` compiled into
/// `<root>/target/classes`.
pub struct Module {
    pub root: PathBuf,
    pub compiler: Arc<ScriptedCompiler>,
    pub orchestrator: CompileOrchestrator,
    configured: bool,
}

impl Module {
    pub fn new(root: &Path, toolchain: Toolchain) -> Self {
        Self::build(root, toolchain, |compilers, engine, store| {
            CompileOrchestrator::new(compilers, engine, store)
        })
    }

    /// A module whose orchestrator takes its settings from `config`.
    pub fn configured(root: &Path, toolchain: Toolchain, config: &KilnConfig) -> Self {
        let layout = AnalysisLayout::new(config.analysis.layout.clone());
        let store_path = layout.store_path_for_output(&root.join("target/classes"));
        let mut module = Self::build(root, toolchain, |compilers, engine, _| {
            CompileOrchestrator::configured(compilers, engine, AnalysisStore::new(store_path), config)
        });
        module.configured = true;
        module
    }

    fn build(
        root: &Path,
        toolchain: Toolchain,
        orchestrator: impl FnOnce(Compilers, Arc<dyn IncrementalEngine>, AnalysisStore) -> CompileOrchestrator,
    ) -> Self {
        std::fs::create_dir_all(root.join("src")).unwrap();
        let compiler = Arc::new(ScriptedCompiler::default());
        let output_dir = root.join("target/classes");
        let store = AnalysisStore::new(AnalysisLayout::default().store_path_for_output(&output_dir));
        let compilers = Compilers {
            toolchain,
            bridge_jar: root.join("bridge.jar"),
        };
        let orchestrator = orchestrator(
            compilers,
            Arc::new(HashingEngine::new(Arc::clone(&compiler))),
            store,
        );
        Self {
            root: root.to_path_buf(),
            compiler,
            orchestrator,
            configured: false,
        }
    }

    pub fn write(&self, name: &str, text: &str) -> PathBuf {
        let path = self.root.join("src").join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join("target/classes")
    }

    pub fn store_path(&self) -> PathBuf {
        self.root.join("target/analysis/compile")
    }

    pub fn sources(&self) -> Vec<PathBuf> {
        kiln_common::fs::list_directory(&self.root.join("src"), |p| p.is_file()).unwrap()
    }

    pub fn compile(
        &self,
        classpath: &[PathBuf],
    ) -> Result<kiln_compile::CompileOutcome, kiln_compile::CompileError> {
        if self.configured {
            return self
                .orchestrator
                .compile_sources(classpath, &self.sources(), &self.output_dir());
        }
        self.orchestrator
            .compile(classpath, &self.sources(), &self.output_dir(), &[], &[])
    }
}

pub fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}
