use std::path::PathBuf;

use crate::types::{Invocation, ProjectRoot};

/// Flags appended to every backend invocation, always last.
pub const BACKEND_FLAGS: [&str; 2] = ["--nocolor", "--backend"];

/// A fully assembled drush command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrushCommand {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl DrushCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            working_dir: None,
        }
    }

    /// `[program, --root=<root>, command, args.., options.., --nocolor, --backend]`
    pub fn backend(program: impl Into<String>, root: &ProjectRoot, invocation: &Invocation) -> Self {
        let mut args = Vec::with_capacity(invocation.args.len() + invocation.options.len() + 4);
        args.push(root.to_flag());
        args.push(invocation.command.clone());
        args.extend(invocation.args.iter().cloned());
        args.extend(invocation.options.iter().cloned());
        args.extend(BACKEND_FLAGS.iter().map(|flag| flag.to_string()));
        Self::new(program, args)
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Program followed by its arguments.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().cloned())
            .collect()
    }

    /// Space-joined command line, as logged and shown on failure.
    pub fn to_command_line(&self) -> String {
        self.argv().join(" ")
    }

    pub fn to_shell_command(&self) -> String {
        let mut cmd = String::new();
        for (i, arg) in self.argv().iter().enumerate() {
            if i > 0 {
                cmd.push(' ');
            }
            if arg.contains(' ') {
                cmd.push_str(&format!("'{arg}'"));
            } else {
                cmd.push_str(arg);
            }
        }
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RootSource;

    #[test]
    fn test_backend_argument_order() {
        let root = ProjectRoot::new("/var/www/site", RootSource::Scanned);
        let invocation = Invocation::new("cache-clear", ["all"], ["--strict"]);
        let command = DrushCommand::backend("/usr/local/bin/drush", &root, &invocation);

        assert_eq!(
            command.argv(),
            vec![
                "/usr/local/bin/drush",
                "--root=/var/www/site",
                "cache-clear",
                "all",
                "--strict",
                "--nocolor",
                "--backend",
            ]
        );
    }

    #[test]
    fn test_backend_flags_come_last_without_args() {
        let root = ProjectRoot::fallback();
        let invocation = Invocation::command("status");
        let command = DrushCommand::backend("drush", &root, &invocation);

        assert_eq!(
            command.args,
            vec!["--root=drush", "status", "--nocolor", "--backend"]
        );
    }

    #[test]
    fn test_shell_command_quotes_spaces() {
        let command = DrushCommand::new("drush", ["ev", "print 1 + 1;"]);
        assert_eq!(command.to_shell_command(), "drush ev 'print 1 + 1;'");
        assert_eq!(command.to_command_line(), "drush ev print 1 + 1;");
    }
}
