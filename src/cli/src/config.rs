use std::{
    fs,
    path::{Path, PathBuf},
};

use color_eyre::eyre::WrapErr;
use second_cycle_finder::SearchOptions;
use serde::{Deserialize, Serialize};

/// A search over a list of first cycles
#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Move sequences of the first cycles, searched in this order
    pub first_cycles: Vec<String>,
    #[serde(default = "enabled")]
    pub share_edge: bool,
    #[serde(default = "enabled")]
    pub share_corner: bool,
    pub target_order: u64,
    /// The log that encodings get appended to
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Generator definitions to use instead of the built in 3x3x3
    #[serde(default)]
    pub puzzle: Option<PathBuf>,
}

fn enabled() -> bool {
    true
}

fn default_output() -> PathBuf {
    PathBuf::from("second_cycles.txt")
}

impl SearchConfig {
    pub fn load(path: &Path) -> color_eyre::Result<SearchConfig> {
        let text = fs::read_to_string(path).wrap_err_with(|| {
            format!("Failed to read the search configuration {}", path.display())
        })?;

        toml::from_str(&text).wrap_err_with(|| {
            format!("Failed to parse the search configuration {}", path.display())
        })
    }

    pub fn options(&self) -> SearchOptions {
        SearchOptions {
            share_edge: self.share_edge,
            share_corner: self.share_corner,
            target_order: self.target_order,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::SearchConfig;

    #[test]
    fn defaults() {
        let config = toml::from_str::<SearchConfig>(
            r#"
            first_cycles = ["U L F L' R2", "R U"]
            target_order = 24
            "#,
        )
        .unwrap();

        assert_eq!(config.first_cycles.len(), 2);
        assert!(config.share_edge);
        assert!(config.share_corner);
        assert_eq!(config.output, PathBuf::from("second_cycles.txt"));
        assert!(config.puzzle.is_none());
        assert_eq!(config.options().target_order, 24);
    }

    #[test]
    fn overrides_and_typos() {
        let config = toml::from_str::<SearchConfig>(
            r#"
            first_cycles = []
            share_corner = false
            target_order = 12
            output = "out.txt"
            "#,
        )
        .unwrap();

        assert!(config.share_edge);
        assert!(!config.options().share_corner);
        assert_eq!(config.output, PathBuf::from("out.txt"));

        assert!(
            toml::from_str::<SearchConfig>("first_cycles = []\ntarget_order = 2\nshare_edges = true")
                .is_err()
        );
    }
}
