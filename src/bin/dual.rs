use busslot::{instance::DualInstance, options::Arguments, pipeline::solve_and_print};
use clap::Parser;
use std::process::exit;
use tracing::error;

fn main() {
    let args = Arguments::parse();
    args.init_logging();

    if let Err(e) = solve_and_print::<DualInstance>(&args, &mut std::io::stdout().lock()) {
        error!("{e}");
        exit(e.exit_code())
    }
}
