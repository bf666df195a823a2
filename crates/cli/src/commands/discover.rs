use anyhow::{Context, Result};
use subdrush_core::DrushApi;

pub fn command_info_command(api: &DrushApi, command: &str) -> Result<()> {
    let info = api
        .command_info(command)
        .with_context(|| format!("Failed to look up drush command '{command}'"))?;
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

pub fn command_args_command(api: &DrushApi, command: &str) -> Result<()> {
    for arg in api.command_args(command)? {
        println!("{arg}");
    }
    Ok(())
}
