use musictl::config::Config;
use musictl::constants::LOG_TIMESTAMP_FORMAT;
use musictl::import::ImportLog;
use owo_colors::OwoColorize;
use std::error::Error;

pub fn handle_history(config: &Config, limit: usize) -> Result<(), Box<dyn Error>> {
    let log = ImportLog::new(config.import_log_path()?);
    let entries = log.read_entries()?;

    if entries.is_empty() {
        println!("No imports recorded in {}", log.path().display());
        return Ok(());
    }

    let start = entries.len().saturating_sub(limit);
    for entry in &entries[start..] {
        println!(
            "{} {}",
            entry
                .timestamp
                .format(LOG_TIMESTAMP_FORMAT)
                .to_string()
                .bright_black(),
            entry.target.display().to_string().cyan()
        );
        println!("  {} {}", "from".bright_black(), entry.source.display());
    }
    println!(
        "\n{} of {} entries",
        entries.len() - start,
        entries.len()
    );

    Ok(())
}
