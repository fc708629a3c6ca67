//! File utility functions

use std::path::PathBuf;

/// Expand a user-supplied path to an absolute path.
///
/// `~` and `~/...` resolve against the home directory; relative paths
/// resolve against the current working directory.
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();

    let expanded = match path {
        "" => PathBuf::from("."),
        "~" => dirs::home_dir().unwrap_or_else(|| PathBuf::from(path)),
        _ => match (path.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(path),
        },
    };

    if expanded.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(&expanded))
            .unwrap_or(expanded)
    } else {
        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_path_absolute() {
        assert_eq!(
            expand_path("/etc/pageviews.json"),
            PathBuf::from("/etc/pageviews.json")
        );
    }

    #[test]
    fn test_expand_path_relative_config() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(
            expand_path("./pageviews.json"),
            cwd.join("./pageviews.json")
        );
        assert_eq!(expand_path("pageviews.json"), cwd.join("pageviews.json"));
    }

    #[test]
    fn test_expand_path_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~"), home);
            assert_eq!(
                expand_path("~/.pageviews/pageviews.json"),
                home.join(".pageviews/pageviews.json")
            );
        }
    }

    #[test]
    fn test_expand_path_trims_and_defaults_to_cwd() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(expand_path("  "), cwd.join("."));
        assert_eq!(expand_path(" /tmp/x.json "), PathBuf::from("/tmp/x.json"));
    }
}
