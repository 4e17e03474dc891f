use crate::algorithm::Registry;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "prngrid", about = "Paint a grid of pseudo-random values in the terminal")]
pub(crate) struct Args {
    /// initial seed, negative allowed (anything non-numeric picks a random one)
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) seed: Option<String>,

    /// algorithm to start with (case-insensitive)
    #[arg(long, short)]
    pub(crate) algorithm: Option<String>,

    /// generate once, print the stats and exit
    #[arg(long)]
    pub(crate) headless: bool,

    /// with --headless: print a JSON summary instead of text
    #[arg(long, requires = "headless")]
    pub(crate) json: bool,

    /// list the available algorithms and exit
    #[arg(long)]
    pub(crate) list: bool,

    /// write logs to this file
    #[arg(long)]
    pub(crate) log_file: Option<PathBuf>,

    /// debug-level logging
    #[arg(long, short)]
    pub(crate) verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Mode {
    Interactive,
    Headless { json: bool },
    List,
}

#[derive(Clone, Debug)]
pub(crate) struct Settings {
    pub(crate) mode: Mode,
    pub(crate) seed_text: Option<String>,
    /// Registered name; `None` means the registry's first entry.
    pub(crate) algorithm: Option<&'static str>,
    pub(crate) log_file: Option<PathBuf>,
    pub(crate) verbose: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::Interactive,
            seed_text: None,
            algorithm: None,
            log_file: None,
            verbose: false,
        }
    }
}

impl Settings {
    pub(crate) fn from_args(args: Args, registry: &Registry) -> Result<Self> {
        let algorithm = match args.algorithm.as_deref() {
            Some(name) => {
                let algo = registry.find_ignore_case(name).with_context(|| {
                    format!("choose one of: {}", registry.names().join(", "))
                })?;
                Some(algo.name)
            }
            None => None,
        };

        let mode = if args.list {
            Mode::List
        } else if args.headless {
            Mode::Headless { json: args.json }
        } else {
            Mode::Interactive
        };

        Ok(Self {
            mode,
            seed_text: args.seed,
            algorithm,
            log_file: args.log_file,
            verbose: args.verbose,
        })
    }
}
