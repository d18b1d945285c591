//! Non-incremental compilation of bridge sources.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use kiln_toolchain::Toolchain;
use tracing::debug;

use crate::error::BridgeError;

/// Everything a bootstrap compile needs.
#[derive(Debug)]
pub struct BootstrapRequest<'a> {
    /// The compiler to run.
    pub toolchain: &'a Toolchain,
    /// Main class of the compiler driver.
    pub main_class: &'a str,
    /// Source files to compile.
    pub sources: &'a [PathBuf],
    /// Compile classpath.
    pub classpath: &'a [PathBuf],
    /// Directory receiving the class files.
    pub output_dir: &'a Path,
    /// Extra compiler options.
    pub options: &'a [String],
}

/// Compiles a fixed set of sources once, with no incremental state.
pub trait BootstrapCompiler: Send + Sync {
    /// Compiles `request.sources` into `request.output_dir`.
    ///
    /// Returns [`BridgeError::BootstrapCompile`] if the compiler reports
    /// errors or cannot be started.
    fn compile(&self, request: &BootstrapRequest<'_>) -> Result<(), BridgeError>;
}

/// Runs the compiler driver in a `java` subprocess.
#[derive(Clone, Debug, Default)]
pub struct ProcessBootstrapCompiler {
    java_home: Option<PathBuf>,
}

impl ProcessBootstrapCompiler {
    /// Uses `java_home/bin/java` when given, otherwise `$JAVA_HOME`, otherwise
    /// `java` from `PATH`.
    pub fn new(java_home: Option<PathBuf>) -> Self {
        Self { java_home }
    }

    /// The `java` executable this compiler launches.
    pub fn java_executable(&self) -> PathBuf {
        let home = self
            .java_home
            .clone()
            .or_else(|| std::env::var_os("JAVA_HOME").filter(|h| !h.is_empty()).map(PathBuf::from));
        match home {
            Some(home) => home.join("bin").join(java_binary_name()),
            None => PathBuf::from(java_binary_name()),
        }
    }

    /// Builds the command line for `request` without running it.
    pub fn command(&self, request: &BootstrapRequest<'_>) -> Result<Command, BridgeError> {
        let mut command = Command::new(self.java_executable());
        command
            .arg("-cp")
            .arg(join_classpath(request.toolchain.all_jars())?)
            .arg(request.main_class)
            .arg("-d")
            .arg(request.output_dir)
            .arg("-classpath")
            .arg(join_classpath(request.classpath)?)
            .args(request.options)
            .args(request.sources);
        Ok(command)
    }
}

impl BootstrapCompiler for ProcessBootstrapCompiler {
    fn compile(&self, request: &BootstrapRequest<'_>) -> Result<(), BridgeError> {
        let mut command = self.command(request)?;
        debug!(sources = request.sources.len(), "running bootstrap compiler");
        let output = command.output().map_err(|e| BridgeError::BootstrapCompile {
            reason: format!("failed to run {}: {e}", self.java_executable().display()),
        })?;
        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let reason = if stderr.is_empty() {
            format!("compiler exited with {}", output.status)
        } else {
            stderr
        };
        Err(BridgeError::BootstrapCompile { reason })
    }
}

fn java_binary_name() -> &'static str {
    if cfg!(windows) {
        "java.exe"
    } else {
        "java"
    }
}

fn join_classpath(paths: &[PathBuf]) -> Result<OsString, BridgeError> {
    std::env::join_paths(paths).map_err(|e| BridgeError::BootstrapCompile {
        reason: format!("invalid classpath entry: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_toolchain::{LoadingContextRegistry, ToolchainProvisioner, ToolchainSpec};
    use std::io::Write;
    use std::sync::Arc;

    fn toolchain(dir: &Path) -> Toolchain {
        let mut jars = Vec::new();
        for name in ["scala-library.jar", "scala-compiler.jar"] {
            let path = dir.join(name);
            let mut jar = zip::ZipWriter::new(std::fs::File::create(&path).unwrap());
            jar.start_file("a/A.class", zip::write::SimpleFileOptions::default())
                .unwrap();
            jar.write_all(b"\xca\xfe").unwrap();
            jar.finish().unwrap();
            jars.push(path);
        }
        let spec = ToolchainSpec {
            version: "2.13.12".to_string(),
            library_jar: jars[0].clone(),
            compiler_jar: jars[1].clone(),
            reflect_jar: None,
            extra_jars: Vec::new(),
        };
        ToolchainProvisioner::new(Arc::new(LoadingContextRegistry::new()))
            .instance(&spec)
            .unwrap()
    }

    #[test]
    fn explicit_java_home_wins() {
        let compiler = ProcessBootstrapCompiler::new(Some(PathBuf::from("/opt/jdk")));
        assert_eq!(
            compiler.java_executable(),
            PathBuf::from("/opt/jdk").join("bin").join(java_binary_name())
        );
    }

    #[test]
    fn command_line_layout() {
        let dir = tempfile::tempdir().unwrap();
        let toolchain = toolchain(dir.path());
        let sources = vec![dir.path().join("Bridge.scala")];
        let classpath = vec![dir.path().join("compiler-interface.jar")];
        let options = vec!["-nowarn".to_string()];
        let out = dir.path().join("out");
        let request = BootstrapRequest {
            toolchain: &toolchain,
            main_class: "scala.tools.nsc.Main",
            sources: &sources,
            classpath: &classpath,
            output_dir: &out,
            options: &options,
        };
        let command = ProcessBootstrapCompiler::new(Some(PathBuf::from("/opt/jdk")))
            .command(&request)
            .unwrap();
        let args: Vec<_> = command.get_args().map(|a| a.to_os_string()).collect();
        assert_eq!(args[0], "-cp");
        assert_eq!(args[2], "scala.tools.nsc.Main");
        assert_eq!(args[3], "-d");
        assert_eq!(args[4], out.as_os_str());
        assert_eq!(args[5], "-classpath");
        assert_eq!(args[7], "-nowarn");
        assert_eq!(args[8], sources[0].as_os_str());
    }

    #[test]
    fn missing_java_is_bootstrap_error() {
        let dir = tempfile::tempdir().unwrap();
        let toolchain = toolchain(dir.path());
        let out = dir.path().join("out");
        let request = BootstrapRequest {
            toolchain: &toolchain,
            main_class: "scala.tools.nsc.Main",
            sources: &[],
            classpath: &[],
            output_dir: &out,
            options: &[],
        };
        let compiler = ProcessBootstrapCompiler::new(Some(dir.path().join("no-jdk")));
        let err = compiler.compile(&request).unwrap_err();
        assert!(matches!(err, BridgeError::BootstrapCompile { ref reason } if reason.contains("failed to run")));
    }
}
