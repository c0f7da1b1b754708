//! Binary entry point and CLI dispatch.
//!
//! Parses command-line arguments and routes to the appropriate handler:
//! one-shot commands (times, calendar, reload), simulation mode, or the
//! normal daemon run via [`Adhanr`].

use anyhow::Result;

use adhanr::args::{self, CliAction, ParsedArgs};
use adhanr::{Adhanr, commands, config, time_source};

fn main() -> Result<()> {
    let parsed_args = ParsedArgs::from_env();

    match parsed_args.action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(())
        }
        CliAction::ShowHelp => {
            args::display_help();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            std::process::exit(adhanr::constants::EXIT_FAILURE);
        }
        CliAction::Run {
            debug_enabled,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            Adhanr::new(debug_enabled).run()
        }
        CliAction::Times {
            date,
            json,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            commands::times::handle_times_command(date, json)
        }
        CliAction::Calendar { month, config_dir } => {
            config::set_config_dir(config_dir)?;
            commands::calendar::handle_calendar_command(month)
        }
        CliAction::Reload { config_dir } => {
            config::set_config_dir(config_dir)?;
            commands::reload::handle_reload_command()
        }
        CliAction::Simulate {
            debug_enabled,
            start_time,
            end_time,
            multiplier,
            log_to_file,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;

            // Keep the log file guard alive for the simulation's duration
            let guard = commands::simulate::handle_simulate_command(
                start_time,
                end_time,
                multiplier,
                debug_enabled,
                log_to_file,
            )?;

            // Run the daemon with simulated time; skip the lock so a real
            // instance is not disturbed
            Adhanr::new(debug_enabled)
                .without_lock()
                .without_headers()
                .run()?;

            if time_source::simulation_ended() {
                adhanr::log_block_start!("Simulation complete");
                adhanr::log_end!();
            }

            drop(guard);
            Ok(())
        }
    }
}
