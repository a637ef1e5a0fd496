use clap::{CommandFactory, Parser};
use netsift::config::{CliConfig, Config};
use netsift::core::types::ExtractionMode;
use netsift::discovery::{ExtractCandidates, Extractor, InputSource, read_input};
use netsift::reporting::logging;
use netsift::ui::completion::print_completions;
use netsift::ui::output;
use netsift::ui::{Cli, Commands, ProgressReporter, Prompter, cli_to_config};
use netsift::validation::{BatchRunner, BatchSummary, LivenessChecker};
use netsift::{NetSiftError, ProbeResult};

use std::path::Path;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Handle completion commands first
    if let Some(exit_code) = handle_completion_commands(&cli) {
        std::process::exit(exit_code);
    }

    match run_netsift_logic(&cli).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => std::process::exit(report_error(&*e, cli.quiet)),
    }
}

/// Handle completion commands and return exit code if a completion command was processed
pub fn handle_completion_commands(cli: &Cli) -> Option<i32> {
    match cli.command {
        Some(Commands::CompletionGenerate { shell }) => {
            let mut app = Cli::command();
            print_completions(shell, &mut app);
            Some(0)
        }
        None => None,
    }
}

/// Print an error and pick the exit code; "nothing to do" is not a failure.
pub fn report_error(error: &(dyn std::error::Error + 'static), quiet: bool) -> i32 {
    match error.downcast_ref::<NetSiftError>() {
        Some(NetSiftError::NothingToDo(message)) => {
            if !quiet {
                output::display_nothing_to_do(message);
            }
            0
        }
        _ => {
            eprintln!("Error: {error}");
            1
        }
    }
}

/// Main extraction and checking logic extracted from main() for testing
pub async fn run_netsift_logic(cli: &Cli) -> Result<i32, Box<dyn std::error::Error>> {
    let cli_config = cli_to_config(cli);

    let config = load_and_merge_config(&cli_config)?;

    let output_settings = setup_output_settings(&cli_config, &config);
    logging::init_logger(output_settings.verbose, output_settings.quiet);

    let source = resolve_input_source(cli.file.as_deref())?;
    let prompter = Prompter::detect(source == InputSource::Stdin);

    let mode = prompter.choose_mode(cli.extraction_mode())?;
    let items = extract_items(&source, mode)?;

    if output_settings.should_show_details() {
        output::display_extraction(mode, &items);
    }

    let check = decide_check(&prompter, cli.check_choice(), mode, items.len())?;
    let output_path = output::unique_output_path(Path::new(config.effective_output_path()));

    if !check {
        output::write_items(&output_path, &items)?;
        if !output_settings.quiet {
            output::display_saved(&output_path, items.len());
        }
        return Ok(0);
    }

    if output_settings.should_show_details() {
        display_configuration_info(&config);
    }

    let results = check_urls(items, &config, &output_settings).await?;
    let summary = BatchSummary::from_results(&results);

    save_results(&output_path, &results, &output_settings)?;

    if !output_settings.quiet {
        output::display_probe_results(&results, &summary);
        output::display_saved(&output_path, results.len());
    }

    Ok(0)
}

/// Load configuration from file or standard locations and merge with CLI config
pub fn load_and_merge_config(cli_config: &CliConfig) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if cli_config.no_config {
        Config::default()
    } else if let Some(ref config_file) = cli_config.config_file {
        Config::load_from_file(config_file).inspect_err(|e| {
            logging::log_error(
                &format!("Could not load config file '{config_file}'"),
                Some(e),
            );
        })?
    } else {
        Config::load_from_standard_locations()
    };

    // Merge CLI arguments with configuration (CLI takes precedence)
    config.merge_with_cli(cli_config);
    config.validate()?;
    Ok(config)
}

/// Settings for output formatting and display
pub struct OutputSettings {
    pub quiet: bool,
    pub verbose: bool,
    pub output_format: String,
    pub show_progress: bool,
}

impl OutputSettings {
    pub fn should_show_details(&self) -> bool {
        !self.quiet
    }
}

/// Setup output settings based on CLI and config
pub fn setup_output_settings(cli_config: &CliConfig, config: &Config) -> OutputSettings {
    let quiet = cli_config.quiet;

    OutputSettings {
        quiet,
        verbose: config.verbose.unwrap_or(false),
        output_format: config.effective_output_format().to_string(),
        show_progress: !quiet && !cli_config.no_progress,
    }
}

/// Input from the FILE argument; without one, stdin is used unless it is a terminal.
pub fn resolve_input_source(file: Option<&str>) -> Result<InputSource, NetSiftError> {
    match file {
        Some(arg) => Ok(InputSource::from_arg(arg)),
        None if atty::isnt(atty::Stream::Stdin) => Ok(InputSource::Stdin),
        None => Err(NetSiftError::InvalidArgument(
            "No input provided. Pass a FILE or pipe text on stdin ('-').".to_string(),
        )),
    }
}

/// Read the input and extract unique identifiers for `mode`.
pub fn extract_items(source: &InputSource, mode: ExtractionMode) -> Result<Vec<String>, NetSiftError> {
    let text = read_input(source)?;
    if text.trim().is_empty() {
        return Err(NetSiftError::NothingToDo(format!(
            "{} contains no text",
            source.describe()
        )));
    }

    let items: Vec<String> = Extractor::default()
        .extract(&text, mode)
        .into_iter()
        .map(|candidate| candidate.into_string())
        .collect();

    logging::log_extraction(mode, items.len(), &source.describe());

    if items.is_empty() {
        return Err(NetSiftError::NothingToDo(format!(
            "No {mode} identifiers found in {}",
            source.describe()
        )));
    }

    Ok(items)
}

/// Only URLs are probed; an IPv4 list is always written as-is.
pub fn decide_check(
    prompter: &Prompter,
    given: Option<bool>,
    mode: ExtractionMode,
    count: usize,
) -> Result<bool, NetSiftError> {
    match mode {
        ExtractionMode::Ip => {
            if given == Some(true) {
                logging::log_warning("Liveness checking applies to URLs only; skipping");
            }
            Ok(false)
        }
        ExtractionMode::Url => prompter.confirm_check(given, count),
    }
}

/// Display configuration information
pub fn display_configuration_info(config: &Config) {
    let concurrency = config.effective_concurrency();
    logging::log_config_info(config, concurrency);
    output::display_config_info(config, concurrency);
}

/// Probe `urls` on a background task, cancelling the batch on Ctrl-C.
pub async fn check_urls(
    urls: Vec<String>,
    config: &Config,
    output_settings: &OutputSettings,
) -> Result<Vec<ProbeResult>, NetSiftError> {
    let concurrency = config.effective_concurrency();
    let checker = LivenessChecker::from_config(config)?;
    let runner = BatchRunner::new(checker, concurrency);

    let mut progress = ProgressReporter::new(output_settings.show_progress);
    progress.start_probing(urls.len());

    logging::log_batch_start(urls.len(), concurrency);
    let start_time = std::time::Instant::now();

    let handle = runner.spawn(urls, progress.callback());
    let token = handle.cancellation_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });

    let outcome = handle.join().await;
    interrupt.abort();

    let results = match outcome {
        Ok(results) => results,
        Err(err) => {
            if let NetSiftError::Cancelled { completed, total } = &err {
                let message = format!("Interrupted after {completed}/{total} probes");
                logging::log_warning(&message);
                progress.log_warning(&message);
            }
            progress.finish_and_clear();
            return Err(err);
        }
    };

    let summary = BatchSummary::from_results(&results);
    progress.finish_probing(&summary);
    logging::log_batch_complete(
        summary.total,
        summary.reachable,
        summary.errors,
        start_time.elapsed().as_millis(),
    );

    Ok(results)
}

/// Write results in the configured format
pub fn save_results(
    path: &Path,
    results: &[ProbeResult],
    output_settings: &OutputSettings,
) -> Result<(), NetSiftError> {
    output::write_results(path, results, &output_settings.output_format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use netsift::core::constants::output_formats;
    use std::fs;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn create_test_cli() -> Cli {
        Cli {
            command: None,
            file: Some("notes.txt".to_string()),
            mode: None,
            check: false,
            no_check: false,
            timeout: None,
            concurrency: None,
            retry: None,
            backoff: None,
            output: None,
            format: None,
            quiet: false,
            verbose: false,
            no_progress: false,
            user_agent: None,
            verify_tls: false,
            config: None,
            no_config: true,
        }
    }

    fn quiet_settings() -> OutputSettings {
        OutputSettings {
            quiet: true,
            verbose: false,
            output_format: output_formats::TEXT.to_string(),
            show_progress: false,
        }
    }

    #[test]
    fn test_handle_completion_commands_none() {
        let cli = create_test_cli();
        assert_eq!(handle_completion_commands(&cli), None);
    }

    #[test]
    fn test_report_error_exit_codes() {
        let nothing = NetSiftError::NothingToDo("No url identifiers found".to_string());
        assert_eq!(report_error(&nothing, true), 0);

        let missing = NetSiftError::InvalidArgument("File not found".to_string());
        assert_eq!(report_error(&missing, true), 1);

        let cancelled = NetSiftError::Cancelled {
            completed: 1,
            total: 4,
        };
        assert_eq!(report_error(&cancelled, true), 1);
    }

    #[test]
    fn test_load_and_merge_config_cli_overrides() -> Result<(), Box<dyn std::error::Error>> {
        let cli_config = CliConfig {
            no_config: true,
            timeout: Some(3),
            retry_attempts: Some(1),
            ..Default::default()
        };

        let config = load_and_merge_config(&cli_config)?;

        assert_eq!(config.timeout, Some(3));
        assert_eq!(config.retry_attempts, Some(1));
        Ok(())
    }

    #[test]
    fn test_load_and_merge_config_rejects_invalid_values() {
        let cli_config = CliConfig {
            no_config: true,
            concurrency: Some(0),
            ..Default::default()
        };

        assert!(load_and_merge_config(&cli_config).is_err());
    }

    #[test]
    fn test_load_and_merge_config_from_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "timeout = 42\noutput_format = \"json\"")?;
        let cli_config = CliConfig {
            config_file: Some(file.path().display().to_string()),
            ..Default::default()
        };

        let config = load_and_merge_config(&cli_config)?;

        assert_eq!(config.timeout, Some(42));
        assert_eq!(config.effective_output_format(), "json");
        Ok(())
    }

    #[test]
    fn test_setup_output_settings() {
        let cli_config = CliConfig {
            quiet: true,
            ..Default::default()
        };

        let settings = setup_output_settings(&cli_config, &Config::default());

        assert!(settings.quiet);
        assert!(!settings.show_progress);
        assert!(!settings.should_show_details());
        assert_eq!(settings.output_format, output_formats::TEXT);
    }

    #[test]
    fn test_resolve_input_source_explicit() {
        assert_eq!(
            resolve_input_source(Some("-")).unwrap(),
            InputSource::Stdin
        );
        assert_eq!(
            resolve_input_source(Some("notes.txt")).unwrap(),
            InputSource::File("notes.txt".to_string())
        );
    }

    #[test]
    fn test_extract_items_from_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "gateway 192.168.1.1, backup 10.0.0.2 and 999.1.1.1")?;
        let source = InputSource::File(file.path().display().to_string());

        let ips = extract_items(&source, ExtractionMode::Ip)?;

        assert_eq!(ips, vec!["192.168.1.1", "10.0.0.2"]);
        Ok(())
    }

    #[test]
    fn test_extract_items_nothing_to_do() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "no identifiers in here")?;
        let source = InputSource::File(file.path().display().to_string());

        let err = extract_items(&source, ExtractionMode::Url).unwrap_err();
        assert!(err.is_nothing_to_do());

        let empty = NamedTempFile::new()?;
        let source = InputSource::File(empty.path().display().to_string());
        assert!(extract_items(&source, ExtractionMode::Ip)
            .unwrap_err()
            .is_nothing_to_do());
        Ok(())
    }

    #[test]
    fn test_decide_check() {
        let prompter = Prompter::new(false);

        assert!(!decide_check(&prompter, Some(true), ExtractionMode::Ip, 3).unwrap());
        assert!(decide_check(&prompter, Some(true), ExtractionMode::Url, 3).unwrap());
        assert!(!decide_check(&prompter, None, ExtractionMode::Url, 3).unwrap());
    }

    #[tokio::test]
    async fn test_check_urls_returns_results_in_order() -> Result<(), Box<dyn std::error::Error>> {
        let mut server = Server::new_async().await;
        let _ok = server
            .mock("GET", "/ok")
            .with_status(200)
            .with_body("<title>OK page</title>")
            .create_async()
            .await;
        let _missing = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;
        let urls = vec![server.url() + "/missing", server.url() + "/ok"];
        let config = Config {
            concurrency: Some(2),
            ..Default::default()
        };

        let results = check_urls(urls.clone(), &config, &quiet_settings()).await?;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url, urls[0]);
        assert_eq!(results[0].status.code(), Some(404));
        assert_eq!(results[1].title, "OK page");
        Ok(())
    }

    #[test]
    fn test_save_results_writes_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = dir.path().join("complete.txt");
        let results = vec![ProbeResult::success(
            "http://10.0.0.1".to_string(),
            200,
            "null".to_string(),
        )];

        save_results(&path, &results, &quiet_settings())?;

        assert!(fs::read_to_string(&path)?.starts_with("URL"));
        Ok(())
    }
}
