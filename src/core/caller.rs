//! Call-site annotation
//!
//! Callers are rendered relative to the project root (the nearest directory
//! above the working directory holding a `Cargo.toml`) so terminals can turn
//! them into clickable links. Paths outside the root stay absolute.

use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static PROJECT_ROOT: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Source location of an emitted event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerLocation {
    pub defined: bool,
    pub file: String,
    pub line: u32,
}

impl CallerLocation {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            defined: true,
            file: file.into(),
            line,
        }
    }

    /// A location for callers that could not be resolved
    pub fn undefined() -> Self {
        Self {
            defined: false,
            file: String::new(),
            line: 0,
        }
    }

    pub fn from_location(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line())
    }

    /// `./src/main.rs:42`, an absolute path outside the project, or `undefined`
    pub fn render(&self) -> String {
        if !self.defined {
            return "undefined".to_string();
        }
        format!("{}:{}", relative_to_root(&self.file, project_root()), self.line)
    }
}

/// Project root discovered on first use
pub fn project_root() -> Option<&'static Path> {
    PROJECT_ROOT
        .get_or_init(|| {
            std::env::current_dir()
                .ok()
                .and_then(|dir| find_project_root(&dir))
        })
        .as_deref()
}

/// Walk up from `start` to the first directory containing `Cargo.toml`
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join("Cargo.toml").is_file())
        .map(Path::to_path_buf)
}

fn relative_to_root(file: &str, root: Option<&Path>) -> String {
    let path = Path::new(file);

    // Compiler-recorded paths of local crates are already root-relative
    if path.is_relative() {
        return match root {
            Some(_) => format!("./{}", file.trim_start_matches("./")),
            None => file.to_string(),
        };
    }

    match root.and_then(|root| path.strip_prefix(root).ok()) {
        Some(stripped) => format!("./{}", stripped.display()),
        None => file.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_undefined_marker() {
        assert_eq!(CallerLocation::undefined().render(), "undefined");
    }

    #[test]
    fn test_relative_to_root() {
        let root = Path::new("/work/project");
        assert_eq!(
            relative_to_root("/work/project/src/lib.rs", Some(root)),
            "./src/lib.rs"
        );
        assert_eq!(
            relative_to_root("/elsewhere/dep/src/lib.rs", Some(root)),
            "/elsewhere/dep/src/lib.rs"
        );
        assert_eq!(relative_to_root("src/main.rs", Some(root)), "./src/main.rs");
        assert_eq!(
            relative_to_root("/work/project/src/lib.rs", None),
            "/work/project/src/lib.rs"
        );
    }

    #[test]
    fn test_find_project_root() {
        let dir = TempDir::new().expect("temp dir");
        let nested = dir.path().join("crates").join("inner").join("src");
        std::fs::create_dir_all(&nested).expect("create dirs");
        std::fs::write(dir.path().join("Cargo.toml"), "[workspace]\n").expect("write manifest");

        assert_eq!(find_project_root(&nested), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn test_from_location() {
        let caller = CallerLocation::from_location(Location::caller());
        assert!(caller.defined);
        assert!(caller.render().ends_with(&format!(":{}", caller.line)));
    }
}
