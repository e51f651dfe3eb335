use musictl::config::Config;
use owo_colors::OwoColorize;
use std::error::Error;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

pub fn handle_config_view() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;

    println!("Current musictl configuration:");
    println!("  base_path: {}", config.base_path);
    println!(
        "  music_directories: {}",
        config.music_directories.join(", ")
    );
    println!("  music_extensions: {}", config.music_extensions.join(", "));
    println!("  ignored_dirs: {}", config.ignored_dirs.join(", "));
    println!(
        "  splitter: {} (codec {}, .{})",
        config.splitter.binary, config.splitter.codec, config.splitter.extension
    );
    println!(
        "  import_log: {}",
        config.import_log_path()?.display().to_string().bright_black()
    );

    Ok(())
}

pub fn handle_config_set(key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load()?;

    config.set_value(key, value)?;
    config.save()?;

    println!("Configuration updated: {key} = {value}");

    Ok(())
}

/// Opens the config file in `$VISUAL`/`$EDITOR`, creating it with defaults
/// first so there is always something to edit, then reloads and shows it.
pub fn handle_config_edit() -> Result<(), Box<dyn Error>> {
    let config_path = Config::config_path()?;
    if !Config::exists()? {
        Config::new().save()?;
        println!(
            "{} Wrote default configuration to {}",
            "→".bright_black(),
            config_path.display()
        );
    }

    let visual = std::env::var("VISUAL").ok();
    let editor = std::env::var("EDITOR").ok();
    let (program, args) = editor_command(visual.as_deref(), editor.as_deref());
    launch_editor(&program, &args, &config_path)?;

    if let Err(e) = Config::load() {
        return Err(format!(
            "{} is no longer valid: {e}. Run 'musictl config edit' again to fix it.",
            config_path.display()
        )
        .into());
    }
    handle_config_view()
}

/// Program and leading arguments of the editor; `$VISUAL` wins over `$EDITOR`
/// and either may carry flags, as in `code --wait`.
fn editor_command(visual: Option<&str>, editor: Option<&str>) -> (String, Vec<String>) {
    let configured = [visual, editor]
        .into_iter()
        .flatten()
        .find(|v| !v.trim().is_empty())
        .unwrap_or("vi");
    let mut words = configured.split_whitespace().map(str::to_string);
    let program = words.next().unwrap_or_else(|| "vi".to_string());
    (program, words.collect())
}

fn launch_editor(program: &str, args: &[String], path: &Path) -> Result<(), Box<dyn Error>> {
    println!("Opening {} in {program}", path.display());

    let status = Command::new(program)
        .args(args)
        .arg(path)
        .status()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                format!("Editor '{program}' not found. Set $VISUAL or $EDITOR to a valid editor.")
            }
            _ => format!("Failed to launch editor '{program}': {e}"),
        })?;

    if !status.success() {
        return Err(format!("Editor '{program}' exited with {status}").into());
    }
    Ok(())
}
