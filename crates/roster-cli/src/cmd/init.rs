use anyhow::Context;
use roster_core::{config::Config, io, paths, store::RedbStore};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    println!("Initializing roster in: {}", root.display());

    let dir = paths::roster_dir(root);
    io::ensure_dir(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let config_path = paths::config_path(root);
    let config = if !config_path.exists() {
        let cfg = Config::default();
        cfg.save(root).context("failed to write config.yaml")?;
        println!("  created: {}", paths::CONFIG_FILE);
        cfg
    } else {
        println!("  exists:  {}", paths::CONFIG_FILE);
        Config::load(root).context("failed to load config")?
    };

    let db = config.database_path(root);
    let existed = db.exists();
    RedbStore::open(&db).with_context(|| format!("failed to create database {}", db.display()))?;
    if existed {
        println!("  exists:  {}", db.display());
    } else {
        println!("  created: {}", db.display());
    }

    Ok(())
}
