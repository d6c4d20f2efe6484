pub mod cook;
pub mod init;
pub mod recipe;
pub mod timer;

use anyhow::Context;
use sous_core::chime::{Chime, Silent, TerminalBell};
use sous_core::config::Config;
use sous_core::controller::SessionGuide;
use sous_core::recipe::Recipe;
use sous_core::{paths, store, SousError};
use std::path::Path;

/// Load config, refusing to run against a directory that was never
/// initialized as a kitchen.
pub(crate) fn require_kitchen(root: &Path) -> anyhow::Result<Config> {
    if !paths::sous_dir(root).is_dir() {
        anyhow::bail!(SousError::NotInitialized);
    }
    Config::load(root).context("failed to load config")
}

/// Open the session guide for a recipe: configured store backend, chime per
/// the sound setting, stored session resumed when present.
pub(crate) fn open_guide(root: &Path, slug: &str) -> anyhow::Result<SessionGuide> {
    let config = require_kitchen(root)?;
    let recipe =
        Recipe::load(root, slug).with_context(|| format!("recipe '{slug}' not found"))?;
    let store = store::open_store(root, config.storage).context("failed to open session store")?;
    let chime: Box<dyn Chime> = if config.sound {
        Box::new(TerminalBell::new())
    } else {
        Box::new(Silent)
    };
    Ok(SessionGuide::open(recipe, store, chime))
}
