use clap::Parser;
use templater_cli::cli_args::Cli;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = templater_cli::run(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
