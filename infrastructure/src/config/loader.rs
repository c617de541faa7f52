//! Layered configuration loading
//!
//! Sources merge lowest priority first: built-in defaults, the per-user
//! file, the project file, an explicit `--config` path, then `QUORUM_*`
//! environment variables (`QUORUM_DISPATCH__REQUEST_TIMEOUT_SECS=30`).

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::fmt::Write as _;
use std::path::PathBuf;

const APP_DIR: &str = "ensemble-quorum";
const PROJECT_FILES: [&str; 2] = ["quorum.toml", ".quorum.toml"];
const ENV_PREFIX: &str = "QUORUM_";

/// One TOML file that may take part in the merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub label: &'static str,
    pub path: PathBuf,
}

impl ConfigFile {
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(explicit: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::load_from(&Self::candidate_files(explicit), true)
    }

    /// Merge `files` (lowest priority first) over the defaults.
    ///
    /// Missing files are skipped, except an explicit path.
    pub fn load_from(
        files: &[ConfigFile],
        with_env: bool,
    ) -> Result<FileConfig, Box<figment::Error>> {
        if let Some(missing) = files
            .iter()
            .find(|file| file.label == "explicit" && !file.exists())
        {
            return Err(Box::new(figment::Error::from(format!(
                "config file {} not found",
                missing.path.display()
            ))));
        }

        let figment = files.iter().filter(|file| file.exists()).fold(
            Figment::new().merge(Serialized::defaults(FileConfig::default())),
            |figment, file| figment.merge(Toml::file(&file.path)),
        );
        let figment = if with_env {
            figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
        } else {
            figment
        };
        figment.extract().map_err(Box::new)
    }

    /// Every file location consulted, lowest priority first
    pub fn candidate_files(explicit: Option<&PathBuf>) -> Vec<ConfigFile> {
        let mut files = Vec::new();
        if let Some(dir) = dirs::config_dir() {
            files.push(ConfigFile {
                label: "global",
                path: dir.join(APP_DIR).join("config.toml"),
            });
        }
        // The first project file found wins; the dotfile is the fallback
        let project = PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
            .unwrap_or_else(|| PathBuf::from(PROJECT_FILES[0]));
        files.push(ConfigFile {
            label: "project",
            path: project,
        });
        if let Some(path) = explicit {
            files.push(ConfigFile {
                label: "explicit",
                path: path.clone(),
            });
        }
        files
    }

    /// Human-readable source list for `--show-config`, highest priority first
    pub fn describe_sources(explicit: Option<&PathBuf>) -> String {
        let mut out = String::from("Configuration sources (highest priority first):\n");
        let _ = writeln!(out, "  [env  ] {}* variables", ENV_PREFIX);
        for file in Self::candidate_files(explicit).iter().rev() {
            let mark = if file.exists() { "found" } else { "     " };
            let _ = writeln!(out, "  [{}] {:<8} {}", mark, file.label, file.path.display());
        }
        out.push_str("  [     ] built-in defaults\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(label: &'static str, path: PathBuf) -> ConfigFile {
        ConfigFile { label, path }
    }

    #[test]
    fn test_no_files_gives_defaults() {
        let config = ConfigLoader::load_from(&[], false).unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_later_files_override_earlier() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("quorum.toml");
        std::fs::write(
            &global,
            "[dispatch]\nrequest_timeout_secs = 12\nquery_deadline_secs = 90\n",
        )
        .unwrap();
        std::fs::write(
            &project,
            "[dispatch]\nrequest_timeout_secs = 20\n\n[[agents]]\nid = \"a\"\nport = 9000\nmodel = \"m\"\n",
        )
        .unwrap();

        let config = ConfigLoader::load_from(
            &[file("global", global), file("project", project)],
            false,
        )
        .unwrap();
        assert_eq!(config.dispatch.request_timeout_secs, 20);
        assert_eq!(config.dispatch.query_deadline_secs, 90);
        assert_eq!(config.agents.len(), 1);
    }

    #[test]
    fn test_missing_optional_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            ConfigLoader::load_from(&[file("global", dir.path().join("absent.toml"))], false)
                .unwrap();
        assert!(config.agents.is_empty());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result =
            ConfigLoader::load_from(&[file("explicit", dir.path().join("absent.toml"))], false);
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_types_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[dispatch]\nrequest_timeout_secs = \"soon\"\n").unwrap();
        assert!(ConfigLoader::load_from(&[file("project", path)], false).is_err());
    }

    #[test]
    fn test_candidate_files_end_with_explicit() {
        let explicit = PathBuf::from("/tmp/custom.toml");
        let files = ConfigLoader::candidate_files(Some(&explicit));
        let last = files.last().unwrap();
        assert_eq!(last.label, "explicit");
        assert_eq!(last.path, explicit);
        assert!(files.iter().any(|f| f.label == "project"));
    }

    #[test]
    fn test_describe_sources_lists_env_first() {
        let text = ConfigLoader::describe_sources(None);
        let env = text.find("QUORUM_").unwrap();
        let defaults = text.find("built-in defaults").unwrap();
        assert!(env < defaults);
        assert!(text.contains("project"));
    }
}
