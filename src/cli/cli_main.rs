// Main CLI entrypoint
// (c) 2024 Ross Younger

use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;
use tabled::{settings::style::Style, Table, Tabled};
use tracing::{info, warn};

use super::{
    args::{CliArgs, Command},
    styles::{ERROR, WARNING},
};
use crate::{
    config::{Host, SshConfig},
    util::setup_tracing,
};

/// Main CLI entrypoint
pub fn cli() -> anyhow::Result<ExitCode> {
    let args = CliArgs::parse();
    setup_tracing(args.trace_level(), args.log_file.as_deref()).inspect_err(|e| {
        anstream::eprintln!("{ERROR}Error:{ERROR:#} {e:?}");
    })?;

    run(&args)
        .inspect_err(|e| tracing::error!("{e:#}"))
        .or(Ok(ExitCode::FAILURE))
}

fn run(args: &CliArgs) -> anyhow::Result<ExitCode> {
    let mut config = SshConfig::at_or_default(args.file.as_deref())?;
    let path = config.path().display().to_string();
    let _ = if args.inherit_defaults {
        config.read_inheriting_defaults()
    } else {
        config.read()
    }
    .with_context(|| format!("reading {path}"))?;

    match &args.command {
        Command::Show { alias } => {
            let host = config.effective_config(alias)?;
            if host.is_empty() {
                info!("no options apply to {alias}");
            } else {
                println!("{}", options_table(&host));
            }
        }
        Command::Alias { hostname } => {
            let Some(alias) = config.alias_for_hostname(hostname) else {
                anstream::eprintln!("{WARNING}no alias found for {hostname}{WARNING:#}");
                return Ok(ExitCode::FAILURE);
            };
            println!("{alias}");
        }
        Command::List => println!("{}", blocks_table(&config)),
        Command::Set {
            pattern,
            keyword,
            value,
            create,
        } => {
            if config.find(pattern).is_none() {
                anyhow::ensure!(*create, "no Host block has the pattern `{pattern}`");
                info!("adding Host {pattern}");
                config.push(Host::new(pattern)?);
            }
            let host = config
                .find_mut(pattern)
                .with_context(|| format!("no Host block has the pattern `{pattern}`"))?;
            host.set(keyword, value)
                .with_context(|| format!("setting {keyword} for Host {pattern}"))?;
            config.write()?;
            info!("set {keyword} for Host {pattern}");
        }
        Command::Unset { pattern, keyword } => {
            let host = config
                .find_mut(pattern)
                .with_context(|| format!("no Host block has the pattern `{pattern}`"))?;
            if host.unset(keyword).is_none() {
                warn!("{keyword} was not set for Host {pattern}");
                return Ok(ExitCode::SUCCESS);
            }
            config.write()?;
            info!("removed {keyword} from Host {pattern}");
        }
        Command::Format { write } => {
            if *write {
                config.write()?;
                info!("rewrote {}", config.path().display());
            } else {
                println!("{config}");
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

// PRETTY PRINT SUPPORT ///////////////////////////////////////////////////////////////////////////////////////

#[derive(Tabled)]
struct PrettyOption {
    option: String,
    value: String,
}

#[derive(Tabled)]
struct PrettyBlock {
    host: String,
    hostname: String,
    options: usize,
}

fn options_table(host: &Host) -> String {
    let rows = host.options().map(|(k, v)| PrettyOption {
        option: k.to_string(),
        value: v.to_string(),
    });
    Table::new(rows).with(Style::sharp()).to_string()
}

fn blocks_table(config: &SshConfig) -> String {
    let rows = config
        .hosts()
        .iter()
        .chain(config.defaults())
        .map(|h| PrettyBlock {
            host: h.pattern().to_owned(),
            hostname: h.hostname().unwrap_or_default().to_owned(),
            options: h.len(),
        });
    Table::new(rows).with(Style::sharp()).to_string()
}

#[cfg(test)]
mod test {
    use anyhow::Result;
    use assertables::assert_contains;

    use super::{blocks_table, options_table, run};
    use crate::{
        cli::args::{CliArgs, Command},
        config::{Host, SshConfig},
        util::make_test_tempfile,
    };

    const TEST_CONFIG: &str = "Host *\n\tUser alice\n\nHost quick\n\tHostName test.case.edu\n";

    fn args_for(path: &std::path::Path, command: Command) -> CliArgs {
        CliArgs {
            file: Some(path.to_owned()),
            inherit_defaults: false,
            quiet: false,
            debug: false,
            log_file: None,
            command,
        }
    }

    #[test]
    fn tables() -> Result<()> {
        let config = SshConfig::from_text("<test>", TEST_CONFIG)?;
        let listing = blocks_table(&config);
        assert_contains!(listing, "test.case.edu");
        assert_contains!(listing, "quick");

        let host = Host::with_options("x", [("User", "bob"), ("Port", "2222")])?;
        let shown = options_table(&host);
        assert_contains!(shown, "User");
        assert_contains!(shown, "2222");
        Ok(())
    }

    #[test]
    fn set_and_unset_edit_the_file() -> Result<()> {
        let (path, _dir) = make_test_tempfile(TEST_CONFIG, "config");
        let status = run(&args_for(
            &path,
            Command::Set {
                pattern: "quick".into(),
                keyword: "port".into(),
                value: "2222".into(),
                create: false,
            },
        ))?;
        assert_eq!(status, std::process::ExitCode::SUCCESS);
        assert_contains!(std::fs::read_to_string(&path)?, "\tPort 2222");

        let _ = run(&args_for(
            &path,
            Command::Unset {
                pattern: "quick".into(),
                keyword: "Port".into(),
            },
        ))?;
        assert_eq!(std::fs::read_to_string(&path)?, TEST_CONFIG);
        Ok(())
    }

    #[test]
    fn set_on_missing_block() -> Result<()> {
        let (path, _dir) = make_test_tempfile(TEST_CONFIG, "config");
        let set = |create| Command::Set {
            pattern: "new".into(),
            keyword: "User".into(),
            value: "carol".into(),
            create,
        };
        assert!(run(&args_for(&path, set(false))).is_err());
        let _ = run(&args_for(&path, set(true)))?;
        let mut config = SshConfig::new(&path);
        let _ = config.read()?;
        assert_eq!(config.find("new").and_then(Host::user), Some("carol"));
        Ok(())
    }

    #[test]
    fn format_write_with_inherited_defaults() -> Result<()> {
        let (path, _dir) = make_test_tempfile(TEST_CONFIG, "config");
        let mut args = args_for(&path, Command::Format { write: true });
        args.inherit_defaults = true;
        let _ = run(&args)?;
        assert_eq!(
            std::fs::read_to_string(&path)?,
            "Host quick\n\tHostName test.case.edu\n\tUser alice\n\nHost *\n\tUser alice\n"
        );
        let mut config = SshConfig::new(&path);
        let _ = config.read()?;
        assert_eq!(config.effective_config("quick")?.user(), Some("alice"));
        assert_eq!(config.effective_config("other")?.user(), Some("alice"));
        Ok(())
    }

    #[test]
    fn alias_exit_status() -> Result<()> {
        let (path, _dir) = make_test_tempfile(TEST_CONFIG, "config");
        let found = run(&args_for(
            &path,
            Command::Alias {
                hostname: "test.case.edu".into(),
            },
        ))?;
        assert_eq!(found, std::process::ExitCode::SUCCESS);
        let missing = run(&args_for(
            &path,
            Command::Alias {
                hostname: "non.existent.com".into(),
            },
        ))?;
        assert_eq!(missing, std::process::ExitCode::FAILURE);
        Ok(())
    }
}
