use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use intern_track::cli::{self, Cli, Commands};
use intern_track::{api, logging, Config, Profile};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // --dev keeps config and journal tag separate from the real ones
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    let config_path = Config::resolve_path(profile, cli.config.as_deref())?;
    let config = Config::load_from_path(&config_path)?;

    // Logging is best effort; the app still runs without the journal
    if let Err(err) = logging::init(profile, config.debug_logging || cli.verbose) {
        eprintln!("Warning: could not connect to the system journal: {}", err);
    }
    log::info!("Loaded config from {}", config_path.display());

    let catalog = Arc::new(config.catalog());
    let mut backend = api::backend_from_config(&config, (*catalog).clone())?;

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            let app = intern_track::tui::App::new(config, config_path, backend);
            intern_track::tui::run_event_loop(app)?;
        }
        Commands::SubmitTask {
            description,
            category,
            hours,
            tools,
            skills,
        } => {
            cli::handle_submit_task(description, category, hours, tools, skills, catalog, backend.as_mut())?;
        }
        Commands::Progress { at } => {
            cli::handle_progress(at, config.progress_window())?;
        }
        Commands::Categories => cli::handle_categories(&catalog),
        Commands::Summary { week, month, year } => {
            cli::handle_summary(week, month, year, backend.as_mut())?;
        }
    }

    Ok(())
}
