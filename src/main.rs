//! garden-feat - Feature-graph resolver for image builds

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = garden_feat::cli::run() {
        eprintln!("garden-feat: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
