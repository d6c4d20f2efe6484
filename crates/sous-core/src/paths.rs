use crate::error::{Result, SousError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const SOUS_DIR: &str = ".sous";
pub const RECIPES_DIR: &str = ".sous/recipes";
pub const SESSIONS_DIR: &str = ".sous/sessions";

pub const CONFIG_FILE: &str = ".sous/config.yaml";
pub const SESSIONS_DB_FILE: &str = ".sous/sessions.redb";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn sous_dir(root: &Path) -> PathBuf {
    root.join(SOUS_DIR)
}

pub fn recipes_dir(root: &Path) -> PathBuf {
    root.join(RECIPES_DIR)
}

pub fn recipe_manifest(root: &Path, slug: &str) -> PathBuf {
    recipes_dir(root).join(format!("{slug}.yaml"))
}

pub fn sessions_dir(root: &Path) -> PathBuf {
    root.join(SESSIONS_DIR)
}

pub fn session_file(root: &Path, slug: &str) -> PathBuf {
    sessions_dir(root).join(format!("{slug}.yaml"))
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn sessions_db_path(root: &Path) -> PathBuf {
    root.join(SESSIONS_DB_FILE)
}

// ---------------------------------------------------------------------------
// Slug validation
// ---------------------------------------------------------------------------

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() || slug.len() > 64 || !slug_re().is_match(slug) {
        return Err(SousError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
