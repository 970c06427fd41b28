use std::env;
use std::fs;
use std::path::PathBuf;

/// Filesystem layout for the service.
///
/// `persist_dir` holds one subdirectory per category collection; `data_dir` is
/// the default corpus root for the offline ingest binary.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub persist_dir: PathBuf,
    pub log_dir: PathBuf,
    pub config_path: PathBuf,
}

impl AppPaths {
    pub fn new() -> Self {
        let root = discover_root();
        let data_dir = env_path("DASOM_DATA_DIR").unwrap_or_else(|| root.join("data"));
        let persist_dir =
            env_path("DASOM_PERSIST_DIR").unwrap_or_else(|| root.join("collections"));
        let log_dir = env_path("DASOM_LOG_DIR").unwrap_or_else(|| root.join("logs"));
        let config_path =
            env_path("DASOM_CONFIG").unwrap_or_else(|| root.join("config.yml"));

        for dir in [&persist_dir, &log_dir] {
            let _ = fs::create_dir_all(dir);
        }

        AppPaths {
            data_dir,
            persist_dir,
            log_dir,
            config_path,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var(key).ok().filter(|v| !v.is_empty()).map(PathBuf::from)
}

fn discover_root() -> PathBuf {
    if let Ok(root) = env::var("DASOM_ROOT") {
        return PathBuf::from(root);
    }

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    if manifest_dir.join("config.yml").exists() {
        return manifest_dir;
    }

    env::current_dir().unwrap_or(manifest_dir)
}
