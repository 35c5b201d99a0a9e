//! Startup inputs: behavior scripts on disk, spawn requests, world config.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arena_core::WorldConfig;

/// Population used when no `--spawn` is given.
pub const DEFAULT_SPAWNS: &[(&str, usize)] = &[("actor1", 18), ("actor2", 9)];

/// Parse one `type=count` argument.
pub fn parse_spawn(arg: &str) -> Result<(String, usize), String> {
    let (name, count) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected TYPE=COUNT, got `{arg}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing behavior type in `{arg}`"));
    }
    let count = count
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("bad count in `{arg}`: {e}"))?;
    Ok((name.to_string(), count))
}

/// Every `*.rhai` file directly inside `dir`, as `(type, source)` sorted by
/// type.  The type is the file stem.
pub fn load_behaviors(dir: &Path) -> Result<Vec<(String, String)>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("reading behavior directory {}", dir.display()))?;

    let mut behaviors = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() || path.extension().is_none_or(|ext| ext != "rhai") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let source = fs::read_to_string(&path)
            .with_context(|| format!("reading behavior script {}", path.display()))?;
        behaviors.push((stem.to_string(), source));
    }

    if behaviors.is_empty() {
        bail!("no *.rhai behavior scripts found in {}", dir.display());
    }
    behaviors.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(behaviors)
}

/// Defaults, or a JSON `WorldConfig` where missing fields keep their
/// defaults.
pub fn load_config(path: Option<&Path>) -> Result<WorldConfig> {
    let Some(path) = path else {
        return Ok(WorldConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_arguments() {
        assert_eq!(parse_spawn("actor1=18"), Ok(("actor1".to_string(), 18)));
        assert_eq!(parse_spawn(" wall = 0 "), Ok(("wall".to_string(), 0)));
        assert!(parse_spawn("actor1").is_err());
        assert!(parse_spawn("=3").is_err());
        assert!(parse_spawn("actor1=-1").is_err());
    }

    #[test]
    fn behaviors_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.rhai"), "fn main() {}").unwrap();
        fs::write(dir.path().join("a.rhai"), "fn main() { log(1); }").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let loaded = load_behaviors(dir.path()).unwrap();
        let names: Vec<&str> = loaded.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(loaded[0].1, "fn main() { log(1); }");
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_behaviors(dir.path()).is_err());
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.json");
        fs::write(&path, r#"{ "max_speed": 4.0, "sandbox": { "memory_mb": 2 } }"#).unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.max_speed, 4.0);
        assert_eq!(config.sandbox.memory_mb, 2);
        assert_eq!(config.range, 500.0);
        assert_eq!(config.sandbox.max_operations, WorldConfig::default().sandbox.max_operations);
    }

    #[test]
    fn bundled_behaviors_build() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("behaviors");
        let behaviors = load_behaviors(&dir).unwrap();
        let mut builder = arena_sim::SimBuilder::new(WorldConfig::default());
        for (name, source) in behaviors {
            builder = builder.behavior(name, source);
        }
        for (name, count) in DEFAULT_SPAWNS {
            builder = builder.spawn(*name, *count);
        }
        let mut sim = builder.build().unwrap();
        sim.run_ticks(20, &mut arena_sim::NoopObserver);
        assert!(sim.actors().iter().all(|r| r.crash_count() == 0));
    }
}
