use musictl::cancel::CancelToken;
use musictl::config::Config;
use musictl::import::report::print_import_summary;
use musictl::import::{AssumeYes, ConsolePrompt, ImportOutcome, ImportPipeline, Prompt};
use owo_colors::OwoColorize;
use std::error::Error;
use std::path::Path;

pub fn handle_import(
    config: &Config,
    target: &str,
    source: &str,
    assume_yes: bool,
) -> Result<(), Box<dyn Error>> {
    let cancel = CancelToken::new();
    cancel.cancel_on_interrupt()?;

    let console = ConsolePrompt::new().with_cancel_token(cancel.clone());
    let prompt: &dyn Prompt = if assume_yes { &AssumeYes } else { &console };

    let expanded = shellexpand::tilde(source);
    let source = Path::new(expanded.as_ref());
    println!(
        "{} {} {} {}",
        "Importing".green().bold(),
        source.display().to_string().cyan(),
        "into".bright_black(),
        target.cyan()
    );

    let pipeline = ImportPipeline::new(config, prompt)?.with_cancel_token(cancel);
    match pipeline.run(target, source)? {
        ImportOutcome::Completed(summary) => {
            print_import_summary(&summary);
        }
        ImportOutcome::NothingToDo => {
            println!("{} No audio files or CUE sheets found", "→".bright_black());
        }
        ImportOutcome::Rejected(e) => {
            return Err(format!("{} {e}", "Error:".red().bold()).into());
        }
        ImportOutcome::Interrupted(summary) => {
            println!(
                "\n{} Import interrupted after copying {} file(s); temporary files removed",
                "⚠".yellow(),
                summary.copied
            );
            return Err("import interrupted".into());
        }
    }

    Ok(())
}
