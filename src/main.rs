use clap::Parser;
use gui_action_eval::cli::commands::{cmd_actions, cmd_decode, cmd_grounding};
use gui_action_eval::cli::config::{Cli, Commands, RunSettings, load_config, log_level};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // RUST_LOG wins over the -v count
    env_logger::Builder::new()
        .filter_level(log_level(cli.verbose))
        .parse_default_env()
        .init();

    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Actions {
            pred,
            labels,
            elements,
            format,
            output,
            error_log,
        } => {
            let settings = RunSettings::resolve(&config.run, format, output, error_log);
            cmd_actions(&pred, &labels, elements.as_deref(), &settings, &config)?;
        }
        Commands::Grounding {
            pred,
            labels,
            format,
            output,
            error_log,
        } => {
            let settings = RunSettings::resolve(&config.run, format, output, error_log);
            cmd_grounding(&pred, &labels, &settings, &config)?;
        }
        Commands::Decode {
            input,
            dialect,
            position_format,
            to,
        } => {
            cmd_decode(&input, dialect, position_format.into(), to)?;
        }
    }

    Ok(())
}
