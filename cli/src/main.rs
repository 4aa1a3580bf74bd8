mod commands;
mod loader;
mod terminal;

use commands::{CommandLine, Commands, audit, screen};
use listguard_common::config::Config;
use terminal::{logging, print};

fn main() -> anyhow::Result<()> {
    let commands: CommandLine = CommandLine::parse_args();

    logging::init_logging(commands.quiet);

    let cfg: Config = Config {
        quiet: commands.quiet,
    };
    print::banner(cfg.quiet);

    match commands.command {
        Commands::Audit { inputs, output } => {
            print::header("starting audit", cfg.quiet);
            audit::audit(&inputs, output.as_deref(), &cfg)
        }
        Commands::Screen { inputs } => {
            print::header("screening listings", cfg.quiet);
            screen::screen(&inputs, &cfg)
        }
    }
}
