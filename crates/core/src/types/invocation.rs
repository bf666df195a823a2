use serde::{Deserialize, Serialize};

/// One drush request: a command name, its positional arguments and its
/// options, in the order they are passed on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub options: Vec<String>,
}

impl Invocation {
    pub fn new<A, O>(command: impl Into<String>, args: A, options: O) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// A command with neither arguments nor options.
    pub fn command(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            options: Vec::new(),
        }
    }
}
