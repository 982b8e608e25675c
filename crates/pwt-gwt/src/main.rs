use clap::Parser;
use pwt_gwt::cli::PwtArgs;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = PwtArgs::parse();
    if let Err(e) = args.logging().init_root_logger() {
        eprintln!("could not initialize logging: {}", e);
    }
    match pwt_gwt::cli::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
