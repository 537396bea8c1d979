#![forbid(unsafe_code)]

//! Desktop host binary entry point.

use simhost::Sandbox;
use simhost_desktop::cli::Opts;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_env("SIMHOST_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let opts = Opts::parse();
    if let Err(err) = run(opts) {
        eprintln!("simhost: {err}");
        std::process::exit(1);
    }
}

fn run(opts: Opts) -> simhost::Result<()> {
    simhost_desktop::run(Sandbox::default(), opts)?;
    Ok(())
}
