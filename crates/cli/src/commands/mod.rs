pub mod aliases;
pub mod check;
pub mod discover;
pub mod root;
pub mod run;

pub use aliases::{alias_for_command, aliases_command};
pub use check::check_command;
pub use discover::{command_args_command, command_info_command};
pub use root::root_command;
pub use run::run_command;
