#![forbid(unsafe_code)]

//! Command-line argument parsing for the desktop host.
//!
//! Parses args manually. Supports environment variable overrides via the
//! `SIMHOST_*` prefix; explicit flags win over the environment.

use std::env;
use std::path::PathBuf;
use std::process;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
simhost - desktop host for simulation engines

USAGE:
    simhost [OPTIONS]

OPTIONS:
    --window=NAME         Open a window named NAME; repeat for more windows.
                          Terrain and Control are reserved, anything else is
                          a view (default: one unnamed view)
    --width=N             Window width in pixels (default: engine preference)
    --height=N            Window height in pixels (default: engine preference)
    --chrome-inset=N      Rows reserved at the top of each window (default: 0)
    --seed=N              Fixed seed for reproducible runs
    --open=PATH           Load a conditions file after start
    --script=PATH         Load a script after start
    --save-to=PATH        Target for Super+S (default: simhost.json)
    --debug-script=PATH   Write script debug output to PATH
    --help, -h            Show this help message
    --version, -V         Show version

KEYBINDINGS:
    Super+P   Pause            Super+F   Follow
    Super+W   Weather          Super+T   Territory
    Super+B   Brain            Super+C   Brain code
    Super+D   Tide / daylight  Super+L   Flood
    Super+H   Healthy carrier  Super+E   Clear errors
    Super+[   Previous agent   Super+]   Next agent
    Super+S   Save             Super+Q   Quit
    F1        About

ENVIRONMENT VARIABLES:
    SIMHOST_WINDOWS        Comma-separated window names
    SIMHOST_WIDTH          Override --width
    SIMHOST_HEIGHT         Override --height
    SIMHOST_CHROME_INSET   Override --chrome-inset
    SIMHOST_SEED           Override --seed
    SIMHOST_LOG            Log filter (default: info)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Window names, in opening order. Empty means one unnamed window.
    pub windows: Vec<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub chrome_inset: u32,
    pub seed: Option<u64>,
    pub open: Option<PathBuf>,
    pub script: Option<PathBuf>,
    pub save_to: PathBuf,
    pub debug_script: Option<PathBuf>,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            windows: Vec::new(),
            width: None,
            height: None,
            chrome_inset: 0,
            seed: None,
            open: None,
            script: None,
            save_to: PathBuf::from("simhost.json"),
            debug_script: None,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

impl Opts {
    /// Parse the process arguments and environment.
    ///
    /// Prints help or version and exits when asked to; prints the problem
    /// and exits with status 1 on bad input.
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        match Self::parse_from(args, |key| env::var(key).ok()) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("simhost {VERSION}");
                process::exit(0);
            }
            Err(message) => {
                eprintln!("{message}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Parse `args` with environment lookups through `var`.
    pub fn parse_from<I, F>(args: I, var: F) -> Result<Command, String>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Apply environment variable defaults first
        if let Some(val) = var("SIMHOST_WINDOWS") {
            opts.windows = val
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(val) = var("SIMHOST_WIDTH")
            && let Ok(n) = val.parse()
        {
            opts.width = Some(n);
        }
        if let Some(val) = var("SIMHOST_HEIGHT")
            && let Ok(n) = val.parse()
        {
            opts.height = Some(n);
        }
        if let Some(val) = var("SIMHOST_CHROME_INSET")
            && let Ok(n) = val.parse()
        {
            opts.chrome_inset = n;
        }
        if let Some(val) = var("SIMHOST_SEED")
            && let Ok(n) = val.parse()
        {
            opts.seed = Some(n);
        }

        // Flags replace the environment's window list rather than extend it.
        let mut flag_windows: Vec<String> = Vec::new();

        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                other => {
                    if let Some(val) = other.strip_prefix("--window=") {
                        flag_windows.push(val.to_string());
                    } else if let Some(val) = other.strip_prefix("--width=") {
                        opts.width = Some(number("--width", val)?);
                    } else if let Some(val) = other.strip_prefix("--height=") {
                        opts.height = Some(number("--height", val)?);
                    } else if let Some(val) = other.strip_prefix("--chrome-inset=") {
                        opts.chrome_inset = number("--chrome-inset", val)?;
                    } else if let Some(val) = other.strip_prefix("--seed=") {
                        opts.seed = Some(number("--seed", val)?);
                    } else if let Some(val) = other.strip_prefix("--open=") {
                        opts.open = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--script=") {
                        opts.script = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--save-to=") {
                        opts.save_to = PathBuf::from(val);
                    } else if let Some(val) = other.strip_prefix("--debug-script=") {
                        opts.debug_script = Some(PathBuf::from(val));
                    } else {
                        return Err(format!("Unknown argument: {other}"));
                    }
                }
            }
        }

        if !flag_windows.is_empty() {
            opts.windows = flag_windows;
        }
        Ok(Command::Run(opts))
    }
}

fn number<T: std::str::FromStr>(flag: &str, val: &str) -> Result<T, String> {
    val.parse()
        .map_err(|_| format!("Invalid {flag} value: {val}"))
}
