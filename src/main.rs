use clap::Parser;
use colored::*;
use dialoguer::{theme::ColorfulTheme, Select};
use naqi_calc::cli::{self, App, Cli, Commands, CoordinateArgs, OptionalCoordinateArgs};
use naqi_calc::config::Config;
use naqi_calc::error::Result;
use naqi_calc::logging;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let config = Config::load()?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = logging::init(&config)?;

    info!("Initializing NAQI calculator...");

    let app = match App::new(config, args.json) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize application: {:?}", e);
            println!(
                "{}",
                "Error: Failed to initialize application. Check logs.".red()
            );
            return Err(e.into());
        },
    };

    // Non-interactive mode: run the single command and exit with its status
    if let Some(command) = args.command {
        app.run_command(command).await?;
        return Ok(());
    }

    println!("{}", "Welcome to the NAQI Calculator!".cyan().bold());
    run_menu(&app).await?;
    Ok(())
}

async fn run_menu(app: &App) -> Result<()> {
    loop {
        let options = &[
            "Calculate NAQI for Coordinates",
            "Search Location by Name",
            "Calculate NAQI from Saved Snapshot",
            "Run Demo with Synthetic Data",
            "Show Breakpoint Tables",
            "Exit",
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("What would you like to do?")
            .items(options)
            .default(0)
            .interact_opt()?
            .unwrap_or(options.len() - 1); // Default to Exit if cancelled

        println!("\n---\n");

        let command_result = match selection {
            0 => match cli::prompt_coordinates() {
                Ok((latitude, longitude)) => {
                    app.run_command(Commands::Fetch(CoordinateArgs {
                        latitude,
                        longitude,
                    }))
                    .await
                },
                Err(e) => {
                    println!("{} {}", "Failed to get input:".red(), e);
                    continue;
                },
            },
            1 => search_and_report(app).await,
            2 => match cli::prompt_snapshot_path() {
                Ok(path) => app.run_command(Commands::File { path }).await,
                Err(e) => {
                    println!("{} {}", "Failed to get path:".red(), e);
                    continue;
                },
            },
            3 => {
                app.run_command(Commands::Demo {
                    location: OptionalCoordinateArgs {
                        latitude: None,
                        longitude: None,
                    },
                    seed: None,
                })
                .await
            },
            4 => app.run_command(Commands::Breakpoints { pollutant: None }).await,
            5 => {
                println!("{}", "Exiting application. Goodbye!".green());
                break;
            },
            _ => unreachable!(),
        };

        if let Err(e) = command_result {
            error!("Command execution failed: {:?}", e);
            println!(
                "{} {}",
                "Error executing command:".red(),
                e.to_string().red()
            );
        }

        println!("\n---\n");
    }

    Ok(())
}

/// Prompts for a place name, lets the user choose among the matches and reports the NAQI.
async fn search_and_report(app: &App) -> Result<()> {
    let name = cli::prompt_location_name()?;
    let locations = app.search(&name).await?;
    if locations.is_empty() {
        println!("{}", format!("No locations found matching {:?}", name).yellow());
        return Ok(());
    }

    match cli::select_location(&locations)? {
        Some(index) => app.report_location(&locations[index]).await,
        None => {
            println!("{}", "Search cancelled.".dimmed());
            Ok(())
        },
    }
}
