//! Command-line argument parsing and processing.
//!
//! This module handles parsing of command-line arguments and provides a clean
//! interface for the main application logic. It supports the standard help,
//! version, and debug flags while gracefully handling unknown options.

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run the daemon with these settings
    Run {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Print today's (or a given date's) prayer times and exit
    Times {
        date: Option<String>,
        json: bool,
        config_dir: Option<String>,
    },
    /// Print a Hijri month calendar and exit
    Calendar {
        month: Option<(u32, i32)>,
        config_dir: Option<String>,
    },
    /// Signal a running instance to reload its configuration
    Reload { config_dir: Option<String> },
    /// Simulate time passing for testing the daemon
    Simulate {
        debug_enabled: bool,
        start_time: String,
        end_time: String,
        multiplier: f64,
        log_to_file: bool,
        config_dir: Option<String>,
    },

    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// This function processes the arguments and determines what action should
    /// be taken, including whether to show help, version info, or run normally.
    ///
    /// # Arguments
    /// * `args` - Iterator over command-line arguments (typically from std::env::args())
    ///
    /// # Returns
    /// ParsedArgs containing the determined action
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut debug_enabled = false;
        let mut display_help = false;
        let mut display_version = false;
        let mut run_times = false;
        let mut times_date: Option<String> = None;
        let mut times_json = false;
        let mut run_calendar = false;
        let mut calendar_month: Option<(u32, i32)> = None;
        let mut run_reload = false;
        let mut run_simulate = false;
        let mut simulate_start: Option<String> = None;
        let mut simulate_end: Option<String> = None;
        let mut simulate_multiplier: Option<f64> = None;
        let mut log_to_file = false;
        let mut unknown_arg_found = false;
        let mut config_dir: Option<String> = None;

        // Convert to vector for easier indexed access
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut i = 0;
        while i < args_vec.len() {
            let arg_str = args_vec[i].as_str();
            match arg_str {
                "--debug" | "-d" => debug_enabled = true,
                "--help" | "-h" => display_help = true,
                "--version" | "-V" | "-v" => display_version = true,
                "--json" => times_json = true,
                "--config" | "-c" => {
                    if i + 1 < args_vec.len() && !args_vec[i + 1].starts_with('-') {
                        config_dir = Some(args_vec[i + 1].clone());
                        i += 1; // Skip the parsed argument
                    } else {
                        log_warning!("Missing directory for --config. Usage: --config <directory>");
                        unknown_arg_found = true;
                    }
                }
                "--reload" | "-r" => run_reload = true,
                "--times" | "-t" => {
                    run_times = true;
                    // Optional date argument: --times [YYYY-MM-DD]
                    if i + 1 < args_vec.len() && !args_vec[i + 1].starts_with('-') {
                        let date_str = args_vec[i + 1].clone();
                        if validate_date(&date_str) {
                            times_date = Some(date_str);
                        } else {
                            log_error!("Invalid date format: '{}'. Use YYYY-MM-DD", date_str);
                            unknown_arg_found = true;
                        }
                        i += 1;
                    }
                }
                "--calendar" | "-C" => {
                    run_calendar = true;
                    // Optional month/year pair: --calendar [month year]
                    if i + 2 < args_vec.len()
                        && !args_vec[i + 1].starts_with('-')
                        && !args_vec[i + 2].starts_with('-')
                    {
                        let month = args_vec[i + 1].parse::<u32>();
                        let year = args_vec[i + 2].parse::<i32>();
                        match (month, year) {
                            (Ok(m), Ok(y)) if (1..=12).contains(&m) => {
                                calendar_month = Some((m, y));
                            }
                            _ => {
                                log_error!(
                                    "Invalid calendar month/year: '{} {}'. Usage: --calendar [month 1-12] [hijri year]",
                                    args_vec[i + 1],
                                    args_vec[i + 2]
                                );
                                unknown_arg_found = true;
                            }
                        }
                        i += 2;
                    } else if i + 1 < args_vec.len() && !args_vec[i + 1].starts_with('-') {
                        log_warning!(
                            "Missing year for --calendar. Usage: --calendar <month> <year>"
                        );
                        unknown_arg_found = true;
                        i += 1;
                    }
                }
                "--simulate" | "-S" => {
                    run_simulate = true;
                    // Parse: --simulate <start_time> <end_time> [multiplier] [--log]
                    if i + 2 < args_vec.len() {
                        let start_str = args_vec[i + 1].clone();
                        let end_str = args_vec[i + 2].clone();

                        // Basic shape check, full parsing happens in the simulate command
                        if !validate_datetime(&start_str) {
                            log_error!(
                                "Invalid start time format: '{}'. Use YYYY-MM-DD HH:MM:SS",
                                start_str
                            );
                            unknown_arg_found = true;
                            i += 2;
                        } else if !validate_datetime(&end_str) {
                            log_error!(
                                "Invalid end time format: '{}'. Use YYYY-MM-DD HH:MM:SS",
                                end_str
                            );
                            unknown_arg_found = true;
                            i += 2;
                        } else {
                            simulate_start = Some(start_str);
                            simulate_end = Some(end_str);
                            i += 2;

                            // Optional speed multiplier
                            if i + 1 < args_vec.len()
                                && !args_vec[i + 1].starts_with('-')
                                && let Ok(mult) = args_vec[i + 1].parse::<f64>()
                            {
                                if !(0.1..=3600.0).contains(&mult) {
                                    log_error!(
                                        "Invalid multiplier: {}. Must be between 0.1 and 3600.",
                                        mult
                                    );
                                    unknown_arg_found = true;
                                } else {
                                    simulate_multiplier = Some(mult);
                                }
                                i += 1;
                            }

                            // Optional --log flag
                            if i + 1 < args_vec.len() && args_vec[i + 1] == "--log" {
                                log_to_file = true;
                                i += 1;
                            }
                        }
                    } else {
                        log_warning!(
                            "Missing arguments for --simulate. Usage: --simulate \"YYYY-MM-DD HH:MM:SS\" \"YYYY-MM-DD HH:MM:SS\" [multiplier] [--log]"
                        );
                        unknown_arg_found = true;
                    }
                }
                _ => {
                    if arg_str.starts_with('-') {
                        log_warning!("Unknown option: {arg_str}");
                        unknown_arg_found = true;
                    }
                    // Non-option arguments are currently ignored
                }
            }
            i += 1;
        }

        // Determine the action based on parsed flags
        let action = if display_version {
            CliAction::ShowVersion
        } else if display_help || unknown_arg_found {
            if unknown_arg_found {
                CliAction::ShowHelpDueToError
            } else {
                CliAction::ShowHelp
            }
        } else if run_reload {
            CliAction::Reload { config_dir }
        } else if run_times {
            CliAction::Times {
                date: times_date,
                json: times_json,
                config_dir,
            }
        } else if run_calendar {
            CliAction::Calendar {
                month: calendar_month,
                config_dir,
            }
        } else if run_simulate {
            match (simulate_start, simulate_end) {
                (Some(start), Some(end)) => CliAction::Simulate {
                    debug_enabled,
                    start_time: start,
                    end_time: end,
                    multiplier: simulate_multiplier.unwrap_or(0.0), // 0 = fast-forward
                    log_to_file,
                    config_dir,
                },
                _ => {
                    log_warning!("Missing start or end time for --simulate");
                    CliAction::ShowHelpDueToError
                }
            }
        } else {
            CliAction::Run {
                debug_enabled,
                config_dir,
            }
        };

        ParsedArgs { action }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Checks the "YYYY-MM-DD" shape without pulling chrono into the parser.
fn validate_date(s: &str) -> bool {
    s.len() == 10 && s.chars().nth(4) == Some('-') && s.chars().nth(7) == Some('-')
}

/// Checks the "YYYY-MM-DD HH:MM:SS" shape.
fn validate_datetime(s: &str) -> bool {
    s.len() == 19
        && s.chars().nth(4) == Some('-')
        && s.chars().nth(7) == Some('-')
        && s.chars().nth(10) == Some(' ')
        && s.chars().nth(13) == Some(':')
        && s.chars().nth(16) == Some(':')
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("adhanr [OPTIONS]");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>     Use custom configuration directory");
    log_indented!("-C, --calendar         Print a Hijri month calendar");
    log_indented!("                       Usage: --calendar [month 1-12] [hijri year]");
    log_indented!("-d, --debug            Enable detailed debug output");
    log_indented!("-h, --help             Print help information");
    log_indented!("-r, --reload           Reload a running instance's configuration");
    log_indented!("-S, --simulate         Run with simulated time (for testing)");
    log_indented!("                       Usage: --simulate <start> <end> [multiplier] [--log]");
    log_indented!("-t, --times            Print prayer times and exit");
    log_indented!("                       Usage: --times [YYYY-MM-DD] [--json]");
    log_indented!("-V, --version          Print version information");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_no_args() {
        let args = vec!["adhanr"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(
            parsed.action,
            CliAction::Run {
                debug_enabled: false,
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_parse_debug_flag() {
        let args = vec!["adhanr", "--debug"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(
            parsed.action,
            CliAction::Run {
                debug_enabled: true,
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_parse_help_flag() {
        let args = vec!["adhanr", "--help"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(parsed.action, CliAction::ShowHelp);
    }

    #[test]
    fn test_parse_version_short_flags() {
        let parsed1 = ParsedArgs::parse(vec!["adhanr", "-V"]);
        assert_eq!(parsed1.action, CliAction::ShowVersion);

        let parsed2 = ParsedArgs::parse(vec!["adhanr", "-v"]);
        assert_eq!(parsed2.action, CliAction::ShowVersion);
    }

    #[test]
    fn test_version_takes_precedence() {
        let args = vec!["adhanr", "--version", "--help", "--debug"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(parsed.action, CliAction::ShowVersion);
    }

    #[test]
    fn test_parse_unknown_flag() {
        let args = vec!["adhanr", "--unknown"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_times_bare() {
        let args = vec!["adhanr", "--times"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(
            parsed.action,
            CliAction::Times {
                date: None,
                json: false,
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_parse_times_with_date_and_json() {
        let args = vec!["adhanr", "-t", "2025-03-15", "--json"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(
            parsed.action,
            CliAction::Times {
                date: Some("2025-03-15".to_string()),
                json: true,
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_parse_times_rejects_bad_date() {
        let args = vec!["adhanr", "--times", "15-03-2025"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_calendar_bare() {
        let args = vec!["adhanr", "--calendar"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(
            parsed.action,
            CliAction::Calendar {
                month: None,
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_parse_calendar_with_month_year() {
        let args = vec!["adhanr", "-C", "9", "1446"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(
            parsed.action,
            CliAction::Calendar {
                month: Some((9, 1446)),
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_parse_calendar_rejects_bad_month() {
        let args = vec!["adhanr", "--calendar", "13", "1446"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_reload() {
        let args = vec!["adhanr", "--reload"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(parsed.action, CliAction::Reload { config_dir: None });
    }

    #[test]
    fn test_parse_reload_with_config_dir() {
        let args = vec!["adhanr", "-r", "--config", "/tmp/adhanr-test"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(
            parsed.action,
            CliAction::Reload {
                config_dir: Some("/tmp/adhanr-test".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_simulate_basic() {
        let args = vec![
            "adhanr",
            "--simulate",
            "2025-01-01 00:00:00",
            "2025-01-02 00:00:00",
        ];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(
            parsed.action,
            CliAction::Simulate {
                debug_enabled: false,
                start_time: "2025-01-01 00:00:00".to_string(),
                end_time: "2025-01-02 00:00:00".to_string(),
                multiplier: 0.0,
                log_to_file: false,
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_parse_simulate_with_multiplier_and_log() {
        let args = vec![
            "adhanr",
            "-S",
            "2025-01-01 00:00:00",
            "2025-01-01 12:00:00",
            "600",
            "--log",
        ];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(
            parsed.action,
            CliAction::Simulate {
                debug_enabled: false,
                start_time: "2025-01-01 00:00:00".to_string(),
                end_time: "2025-01-01 12:00:00".to_string(),
                multiplier: 600.0,
                log_to_file: true,
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_parse_simulate_rejects_bad_format() {
        let args = vec!["adhanr", "--simulate", "2025-01-01", "2025-01-02"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_simulate_missing_args() {
        let args = vec!["adhanr", "--simulate", "2025-01-01 00:00:00"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_simulate_out_of_range_multiplier() {
        let args = vec![
            "adhanr",
            "-S",
            "2025-01-01 00:00:00",
            "2025-01-02 00:00:00",
            "10000",
        ];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }
}
