use std::path::{Path, PathBuf};

/// Resolve the kitchen root directory.
///
/// Priority:
/// 1. `--root` flag / `SOUS_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.sous/`
/// 3. The home directory (a personal kitchen lives in `$HOME/.sous`)
/// 4. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    // Walk upward looking for .sous/
    let mut dir = cwd.clone();
    loop {
        if dir.join(".sous").is_dir() {
            return dir;
        }
        match dir.parent() {
            Some(p) => dir = p.to_path_buf(),
            None => break,
        }
    }

    if let Some(home) = home::home_dir() {
        return home;
    }

    cwd
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        let result = resolve_root(Some(dir.path()));
        assert_eq!(result, dir.path());
    }

    #[test]
    fn explicit_root_wins_even_without_sous_dir() {
        let dir = TempDir::new().unwrap();
        // No .sous/ inside — explicit path is still honored as-is
        let result = resolve_root(Some(&dir.path().join("nested")));
        assert_eq!(result, dir.path().join("nested"));
    }
}
