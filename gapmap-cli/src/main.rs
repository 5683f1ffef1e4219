//! Entry point for the `gapmap` command-line interface.
#![forbid(unsafe_code)]

use gapmap_cli::CliError;

#[expect(
    clippy::print_stderr,
    reason = "the binary reports fatal errors on stderr"
)]
fn main() {
    match gapmap_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("gapmap: {err}");
            std::process::exit(1);
        }
    }
}
