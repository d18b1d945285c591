//! Turns `kiln.toml` into the toolchain, coordinates and bridge cache the
//! commands work with.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use kiln_bridge::{
    BridgeArtifactCache, Coordinate, EngineRelease, LocalRepository, ProcessBootstrapCompiler,
    Scope,
};
use kiln_config::{DependencyConfig, DependencyScope, KilnConfig, CONFIG_FILE};
use kiln_toolchain::{
    LoadingContextRegistry, OverriddenCoordinates, ScalaCoordinates, Toolchain,
    ToolchainProvisioner, ToolchainSpec,
};

use crate::GlobalArgs;

/// Walks up from `start` looking for `kiln.toml`.
pub fn find_config(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILE);
        if candidate.is_file() {
            return Ok(candidate);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Loads the configuration named by `--config`, or the nearest `kiln.toml`.
///
/// `--config` may name the file itself or the directory containing it.
pub fn load(global: &GlobalArgs) -> Result<KilnConfig, Box<dyn std::error::Error>> {
    let path = match &global.config {
        Some(config) => {
            let p = PathBuf::from(config);
            if p.is_dir() {
                p.join(CONFIG_FILE)
            } else {
                p
            }
        }
        None => find_config(&std::env::current_dir()?)?,
    };
    Ok(kiln_config::load_config_file(&path)?)
}

/// The toolchain described by the `[toolchain]` section.
pub fn toolchain_spec(config: &KilnConfig) -> ToolchainSpec {
    ToolchainSpec {
        version: config.toolchain.version.clone(),
        library_jar: config.toolchain.library_jar.clone(),
        compiler_jar: config.toolchain.compiler_jar.clone(),
        reflect_jar: config.toolchain.reflect_jar.clone(),
        extra_jars: config.toolchain.extra_jars.clone(),
    }
}

/// Provisions the configured toolchain with a fresh registry.
pub fn toolchain(config: &KilnConfig) -> Result<Toolchain, Box<dyn std::error::Error>> {
    let provisioner = ToolchainProvisioner::new(Arc::new(LoadingContextRegistry::new()));
    Ok(provisioner.instance(&toolchain_spec(config))?)
}

/// Bridge coordinates derived from the toolchain version, with the
/// `[bridge]` overrides applied.
pub fn coordinates(
    config: &KilnConfig,
    toolchain: &Toolchain,
) -> OverriddenCoordinates<ScalaCoordinates> {
    OverriddenCoordinates::new(ScalaCoordinates::for_version(toolchain.version().clone()))
        .with_main_class(config.toolchain.main_class.clone())
        .with_bridge_group_id(config.bridge.group.clone())
        .with_bridge_artifact_id(config.bridge.artifact.clone())
        .with_bridge_version(config.bridge.version.clone())
}

/// The bridge cache backed by the local repository and a `java`
/// subprocess compiler.
pub fn bridge_cache(
    config: &KilnConfig,
) -> Result<BridgeArtifactCache, Box<dyn std::error::Error>> {
    let repository = LocalRepository::new(config.repository.local_or_default()?)
        .with_dependencies(config.bridge.dependencies.iter().map(dependency).collect());
    Ok(BridgeArtifactCache::new(
        config.cache.secondary_dir_or_default()?,
        EngineRelease::new(&config.engine.version, &config.engine.timestamp),
        &config.runtime.class_version,
        Arc::new(repository),
        Arc::new(ProcessBootstrapCompiler::new(config.runtime.java_home.clone())),
    ))
}

fn dependency(dep: &DependencyConfig) -> (Coordinate, Scope) {
    let mut coordinate = Coordinate::new(&dep.group, &dep.artifact, &dep.version);
    if let Some(classifier) = &dep.classifier {
        coordinate = coordinate.with_classifier(classifier);
    }
    (coordinate, scope(dep.scope))
}

fn scope(scope: DependencyScope) -> Scope {
    match scope {
        DependencyScope::Compile => Scope::Compile,
        DependencyScope::Runtime => Scope::Runtime,
        DependencyScope::Provided => Scope::Provided,
        DependencyScope::Test => Scope::Test,
        DependencyScope::System => Scope::System,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_toolchain::CompilerCoordinates;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_jar(path: &Path, entry: &str) {
        let file = fs::File::create(path).unwrap();
        let mut jar = zip::ZipWriter::new(file);
        jar.start_file(entry, zip::write::SimpleFileOptions::default())
            .unwrap();
        jar.write_all(b"\xca\xfe\xba\xbe").unwrap();
        jar.finish().unwrap();
    }

    fn project(extra: &str) -> (TempDir, KilnConfig) {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("lib")).unwrap();
        write_jar(&tmp.path().join("lib/library.jar"), "scala/Predef.class");
        write_jar(&tmp.path().join("lib/compiler.jar"), "scala/tools/nsc/Main.class");
        let toml = format!(
            r#"
[toolchain]
version = "2.13.12"
library_jar = "lib/library.jar"
compiler_jar = "lib/compiler.jar"

[engine]
version = "1.9.3"
timestamp = "20230713T100000"

[cache]
secondary_dir = "bridges"
{extra}
"#
        );
        fs::write(tmp.path().join(CONFIG_FILE), toml).unwrap();
        let config = kiln_config::load_config(tmp.path()).unwrap();
        (tmp, config)
    }

    #[test]
    fn find_config_in_parent() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "").unwrap();
        let nested = tmp.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_config(&nested).unwrap(), tmp.path().join(CONFIG_FILE));
    }

    #[test]
    fn load_from_config_dir() {
        let (tmp, _) = project("");
        let global = GlobalArgs {
            quiet: false,
            verbose: false,
            config: Some(tmp.path().to_str().unwrap().to_string()),
        };
        let config = load(&global).unwrap();
        assert_eq!(config.toolchain.library_jar, tmp.path().join("lib/library.jar"));
    }

    #[test]
    fn derived_coordinates() {
        let (_tmp, config) = project("");
        let toolchain = toolchain(&config).unwrap();
        let coordinates = coordinates(&config, &toolchain);
        assert_eq!(coordinates.bridge_group_id(), "org.scala-sbt");
        assert_eq!(
            coordinates.bridge_artifact_id(toolchain.version()),
            "compiler-bridge_2.13"
        );
        assert_eq!(coordinates.main_class(), "scala.tools.nsc.Main");
    }

    #[test]
    fn configured_overrides_win() {
        let (_tmp, config) = project(
            r#"
[bridge]
artifact = "custom-bridge"
version = "9.9.9"
"#,
        );
        let toolchain = toolchain(&config).unwrap();
        let coordinates = coordinates(&config, &toolchain);
        assert_eq!(coordinates.bridge_artifact_id(toolchain.version()), "custom-bridge");
        assert_eq!(coordinates.bridge_version(toolchain.version(), "1.9.3"), "9.9.9");
    }

    #[test]
    fn cache_key_uses_engine_and_runtime() {
        let (tmp, config) = project("");
        let toolchain = toolchain(&config).unwrap();
        let cache = bridge_cache(&config).unwrap();
        let key = cache.key_for(&toolchain, &coordinates(&config, &toolchain));
        assert_eq!(
            key.to_string(),
            "org.scala-sbt-compiler-bridge_2.13-1.9.3-bin_2.13.12__52.0-1.9.3_20230713T100000"
        );
        assert_eq!(cache.cache_dir(), tmp.path().join("bridges"));
    }

    #[test]
    fn dependency_scopes_map_across() {
        let dep = DependencyConfig {
            group: "org.scala-lang".to_string(),
            artifact: "scala-library".to_string(),
            version: "2.13.12".to_string(),
            classifier: None,
            scope: DependencyScope::Provided,
        };
        let (coordinate, scope) = dependency(&dep);
        assert_eq!(coordinate.to_string(), "org.scala-lang:scala-library:2.13.12");
        assert_eq!(scope, Scope::Provided);
    }
}
