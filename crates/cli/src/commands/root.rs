use anyhow::Result;
use subdrush_core::DrushApi;
use tracing::info;

pub fn root_command(api: &DrushApi) -> Result<()> {
    let root = api.project_root()?;
    info!("Root {} resolved via {:?}", root, root.source);

    if root.is_fallback() {
        eprintln!("No Drupal root found, using the fallback cache bin");
    }
    println!("{}", root.path().display());
    Ok(())
}
