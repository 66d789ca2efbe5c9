use std::path::Path;

use anyhow::{bail, Result};

use pagescroll_core::ScrollConfig;

pub fn path(config_path: &Path) -> Result<()> {
    println!("{}", config_path.display());
    if !config_path.exists() {
        println!("(not created yet, defaults are in use; run `pagescroll config init`)");
    }
    Ok(())
}

pub fn show(config: &ScrollConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    if config.duration_ms.is_none() && config.speed.is_none() {
        println!(
            "# no duration_ms or speed set, scrolls take {} ms",
            pagescroll_core::config::DEFAULT_DURATION_MS
        );
    }
    Ok(())
}

pub fn init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "{} already exists, use --force to overwrite it",
            config_path.display()
        );
    }

    ScrollConfig::default().save_to(config_path)?;
    println!("Wrote default configuration to {}", config_path.display());
    Ok(())
}
