use anyhow::Context;
use sous_core::config::Config;
use sous_core::{io, paths};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    io::ensure_dir(&paths::recipes_dir(root)).context("failed to create recipes dir")?;
    io::ensure_dir(&paths::sessions_dir(root)).context("failed to create sessions dir")?;

    let kitchen = root
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("kitchen");
    let config = Config::new(kitchen);
    let data = serde_yaml::to_string(&config).context("failed to serialize config")?;
    let written = io::write_if_missing(&paths::config_path(root), data.as_bytes())
        .context("failed to write config")?;

    if written {
        println!("Initialized kitchen at {}", root.display());
        println!("Next: sous recipe add <file.yaml>");
    } else {
        println!("Kitchen already initialized at {}", root.display());
    }
    Ok(())
}
