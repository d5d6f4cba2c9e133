mod cmd;

use clap::Parser;
use cmd::Cli;

fn main() {
    let cli = Cli::parse();
    bookstore_seed::logging::init(cli.verbose);

    if let Err(e) = cmd::run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
