use std::sync::Arc;

use anyhow::Result;
use subdrush_core::{DrushApi, RunOutcome, dispatch};
use tracing::{debug, info};

pub fn run_command(
    api: DrushApi,
    command: String,
    args: Vec<String>,
    options: Vec<String>,
) -> Result<()> {
    debug!("Running drush {} {:?} {:?}", command, args, options);

    let api = Arc::new(api);
    let worker = Arc::clone(&api);
    let label = command.clone();
    let task = dispatch::spawn(label, move || worker.run_command(&command, args, options))?;

    match task.join()?? {
        RunOutcome::Output(text) => print!("{text}"),
        RunOutcome::NoOutput => {
            info!("Drush finished without output");
            eprintln!("{}", RunOutcome::NoOutput.display_text());
        }
        // Already rendered by the terminal display
        RunOutcome::Failed(_) => std::process::exit(1),
    }

    Ok(())
}
