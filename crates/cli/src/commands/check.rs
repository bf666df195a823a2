use anyhow::Result;
use subdrush_core::DrushApi;
use subdrush_core::version::{REQUIRED_MAJOR_VERSION, meets_requirements};

pub fn check_command(api: &DrushApi) -> Result<()> {
    let major = api.drush_version()?;
    if meets_requirements(major) {
        println!("drush {major}: OK");
        return Ok(());
    }

    eprintln!("drush {major}: Drush {REQUIRED_MAJOR_VERSION} or newer is required");
    std::process::exit(1);
}
