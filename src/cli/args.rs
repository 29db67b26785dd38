// sshconf top-level command-line arguments
// (c) 2024 Ross Younger

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser, Clone)]
#[command(
    author,
    version(env!("SSHCONF_VERSION_STRING")),
    about,
    before_help = "e.g.   sshconf show my-server",
    infer_long_args(true)
)]
#[command(help_template(
    "\
{name} version {version}
{about-with-newline}
{usage-heading} {usage}
{before-help}
{all-args}{after-help}
"
))]
#[command(styles=super::styles::CLAP_STYLES)]
pub(crate) struct CliArgs {
    /// The config file to operate on [default: ~/.ssh/config]
    #[arg(
        short,
        long,
        global = true,
        env = "SSHCONF_FILE",
        value_name("FILE"),
        help_heading("Input")
    )]
    pub(crate) file: Option<PathBuf>,

    /// Treats `Host *` blocks as defaults for every other block.
    ///
    /// If the file is written back (by `set`, `unset` or `format --write`), every block
    /// keeps the options it inherited, and a single combined `Host *` block is written at the end.
    #[arg(long, action, global = true, help_heading("Input"))]
    pub(crate) inherit_defaults: bool,

    /// Quiet mode
    ///
    /// Reports only errors
    #[arg(short, long, action, global = true, conflicts_with("debug"))]
    pub(crate) quiet: bool,

    /// Enable detailed debug output
    ///
    /// This has the same effect as setting `RUST_LOG=sshconf=debug` in the environment.
    /// If present, `RUST_LOG` overrides this option.
    #[arg(short, long, action, global = true, help_heading("Debug"))]
    pub(crate) debug: bool,

    /// Log to a file
    ///
    /// By default the log receives everything printed to stderr.
    /// To override this behaviour, set the environment variable `RUST_LOG_FILE_DETAIL` (same semantics as `RUST_LOG`).
    #[arg(
        short('l'),
        long,
        action,
        global = true,
        help_heading("Debug"),
        value_name("FILE")
    )]
    pub(crate) log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub(crate) command: Command,
}

/// What to do with the config file
#[derive(Debug, Subcommand, Clone)]
pub(crate) enum Command {
    /// Shows the options that apply to a host alias
    Show {
        /// The alias, as you would give it to ssh
        alias: String,
    },
    /// Finds the alias whose `HostName` is exactly the given name.
    ///
    /// Exits with status 1 if there is none.
    Alias {
        /// The real host name
        hostname: String,
    },
    /// Lists every Host block in the file
    List,
    /// Sets an option in a Host block
    Set {
        /// The block's pattern, exactly as written in the file
        pattern: String,
        /// The option to set
        keyword: String,
        /// Its new value; an empty string unsets the option
        value: String,
        /// Appends a new block if there is none with this pattern
        #[arg(long, action)]
        create: bool,
    },
    /// Removes an option from a Host block
    Unset {
        /// The block's pattern, exactly as written in the file
        pattern: String,
        /// The option to remove
        keyword: String,
    },
    /// Prints the file in canonical form
    Format {
        /// Rewrites the file in place instead of printing it
        #[arg(short, long, action)]
        write: bool,
    },
}

impl CliArgs {
    pub(crate) fn trace_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }
}
