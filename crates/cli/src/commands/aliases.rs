use std::path::Path;

use anyhow::{Result, bail};
use subdrush_core::DrushApi;

pub fn aliases_command(api: &DrushApi) -> Result<()> {
    match api.local_site_aliases()? {
        Some(names) if !names.is_empty() => {
            for name in names {
                println!("{name}");
            }
        }
        Some(_) => eprintln!("No local site aliases defined"),
        None => bail!("Drush did not list any site aliases"),
    }
    Ok(())
}

pub fn alias_for_command(api: &DrushApi, dir: &Path) -> Result<()> {
    // Alias roots are absolute, so compare against the absolute directory
    let dir = std::path::absolute(dir)?;
    match api.site_alias_for_root(&dir)? {
        Some(alias) => {
            println!("{alias}");
            Ok(())
        }
        None => bail!("No site alias found for {}", dir.display()),
    }
}
