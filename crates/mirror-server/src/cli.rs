//! Command-line arguments
//!
//! ```text
//! mirror-server [--config <path>] serve
//! mirror-server [--config <path>] sync <Entity> [--clear-existing]
//! mirror-server [--config <path>] entities
//! ```

use anyhow::{anyhow, bail, Result};
use std::path::PathBuf;

pub const USAGE: &str = "\
Usage: mirror-server [--config <path>] <command>

Commands:
  serve                               Run the HTTP API (default)
  sync <Entity> [--clear-existing]    Check fetch and mapping for one entity against a
                                      throwaway store (nothing is persisted) and print
                                      the result as JSON
  entities                            List the configured entity names

Options:
  -c, --config <path>    YAML config file (default: $MIRROR_CONFIG, then ./mirror.yaml)
  -h, --help             Print this help";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Serve,
    Sync { entity: String, clear_existing: bool },
    Entities,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub command: Command,
}

impl CliArgs {
    /// Parse arguments, excluding the program name
    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config_path = None;
        let mut clear_existing = false;
        let mut help = false;
        let mut positional = Vec::new();

        let mut args = args.into_iter().map(Into::into);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    let path = args
                        .next()
                        .ok_or_else(|| anyhow!("{} requires a path", arg))?;
                    config_path = Some(PathBuf::from(path));
                }
                "--clear-existing" => clear_existing = true,
                "--help" | "-h" => help = true,
                flag if flag.starts_with('-') => bail!("Unknown option: {}\n\n{}", flag, USAGE),
                _ => positional.push(arg),
            }
        }

        if help {
            return Ok(Self {
                config_path,
                command: Command::Help,
            });
        }

        let mut positional = positional.into_iter();
        let command = match positional.next().as_deref() {
            None | Some("serve") => Command::Serve,
            Some("entities") => Command::Entities,
            Some("sync") => {
                let entity = positional
                    .next()
                    .ok_or_else(|| anyhow!("sync requires an entity name\n\n{}", USAGE))?;
                Command::Sync {
                    entity,
                    clear_existing,
                }
            }
            Some(other) => bail!("Unknown command: {}\n\n{}", other, USAGE),
        };

        if let Some(extra) = positional.next() {
            bail!("Unexpected argument: {}\n\n{}", extra, USAGE);
        }
        if clear_existing && !matches!(command, Command::Sync { .. }) {
            bail!("--clear-existing only applies to sync");
        }

        Ok(Self {
            config_path,
            command,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_serve() {
        let args = CliArgs::parse(Vec::<String>::new()).unwrap();
        assert_eq!(args.command, Command::Serve);
        assert_eq!(args.config_path, None);
    }

    #[test]
    fn test_sync_with_flags_in_any_position() {
        let args =
            CliArgs::parse(["--clear-existing", "sync", "SalesInvoice", "-c", "erp.yaml"]).unwrap();
        assert_eq!(
            args.command,
            Command::Sync {
                entity: "SalesInvoice".to_string(),
                clear_existing: true
            }
        );
        assert_eq!(args.config_path, Some(PathBuf::from("erp.yaml")));
    }

    #[test]
    fn test_sync_requires_entity() {
        assert!(CliArgs::parse(["sync"]).is_err());
    }

    #[test]
    fn test_rejects_unknown_input() {
        assert!(CliArgs::parse(["frobnicate"]).is_err());
        assert!(CliArgs::parse(["serve", "--verbose"]).is_err());
        assert!(CliArgs::parse(["entities", "extra"]).is_err());
        assert!(CliArgs::parse(["serve", "--clear-existing"]).is_err());
        assert!(CliArgs::parse(["--config"]).is_err());
    }

    #[test]
    fn test_usage_marks_sync_as_check_only() {
        assert!(USAGE.contains("nothing is persisted"));
    }

    #[test]
    fn test_help() {
        let args = CliArgs::parse(["sync", "--help"]).unwrap();
        assert_eq!(args.command, Command::Help);
    }
}
