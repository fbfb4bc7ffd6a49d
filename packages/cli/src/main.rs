use clap::Parser;

use releasefs_cli::{Command, ConfigArgs};

/// releasefs - browse GitHub releases as a directory tree
#[derive(Parser, Debug)]
#[command(name = "releasefs")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    /// Print JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match releasefs_cli::run(&cli.config, &cli.command, cli.json) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
