use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod display;
mod io;
mod util;

fn main() -> ExitCode {
    let cli = cli::parse();
    init_tracing(cli.verbose);

    let ctx = display::Context::detect().with_quiet(match &cli.command {
        cli::Command::Check(args) => args.quiet,
    });

    if ctx.interactive {
        display::print_banner();
    }

    match commands::dispatch(cli.command, ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            display::print_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
