//! Site alias lookups over `drush site-alias` JSON output

use serde_json::Value;
use std::path::Path;
use tracing::warn;

use crate::types::Invocation;

pub fn local_aliases_invocation() -> Invocation {
    Invocation::new("site-alias", Vec::<String>::new(), ["--local", "--format=json"])
}

pub fn full_aliases_invocation() -> Invocation {
    Invocation::new(
        "site-alias",
        Vec::<String>::new(),
        ["-r", "--local", "--full", "--format=json"],
    )
}

/// `@example.local` -> `@example`
fn strip_environment(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(site, _)| site)
}

fn parse_aliases(output: &str) -> Option<serde_json::Map<String, Value>> {
    match serde_json::from_str::<Value>(output) {
        Ok(Value::Object(aliases)) => Some(aliases),
        Ok(other) => {
            warn!("Unexpected site-alias output: {}", other);
            None
        }
        Err(e) => {
            warn!("Could not decode site-alias output: {}", e);
            None
        }
    }
}

/// Alias names (environment suffix dropped) from `site-alias --local`.
pub fn local_alias_names(output: &str) -> Option<Vec<String>> {
    let aliases = parse_aliases(output)?;
    Some(
        aliases
            .values()
            .filter_map(|values| values.get("#name").and_then(Value::as_str))
            .map(|name| strip_environment(name).to_string())
            .collect(),
    )
}

/// The alias whose `root` equals `directory`, without the leading `@` and
/// the environment suffix.
pub fn alias_for_root(output: &str, directory: &Path) -> Option<String> {
    let aliases = parse_aliases(output)?;
    aliases.values().find_map(|values| {
        let root = values.get("root")?.as_str()?.replace("\\/", "/");
        if Path::new(&root) != directory {
            return None;
        }
        let name = values.get("#name")?.as_str()?.replace('@', "");
        Some(strip_environment(&name).to_string())
    })
}
