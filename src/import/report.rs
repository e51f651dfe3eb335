//! Console output for imports and CUE sheet listings.

use super::ImportSummary;
use crate::cue::CueSheet;
use owo_colors::OwoColorize;
use std::path::Path;

pub fn print_cue_listing(cue_path: &Path, audio_path: Option<&Path>, sheet: &CueSheet) {
    println!(
        "\n{} {}",
        "CUE:".bright_black(),
        cue_path.display().to_string().cyan()
    );
    if let Some(audio) = audio_path {
        println!(
            "{} {}",
            "Image:".bright_black(),
            audio.display().to_string().cyan()
        );
    }
    println!(
        "{} {} - {}",
        "Album:".bright_black(),
        sheet.album_artist.bold(),
        sheet.album_title.bold()
    );

    if sheet.is_empty() {
        println!("  {} No tracks declared", "⚠".yellow());
        return;
    }

    for track in &sheet.tracks {
        let end = track
            .end_time
            .map(|tc| tc.to_external_format())
            .unwrap_or_else(|| "end".to_string());
        println!(
            "  {} {} - {} {}",
            format!("{:02}.", track.number).cyan(),
            track.performer,
            track.title,
            format!("[{} → {}]", track.start_time.to_external_format(), end).bright_black()
        );
    }
}

pub fn print_import_summary(summary: &ImportSummary) {
    println!("\n{} {}", "✓".green().bold(), "Import complete!".bold());
    if let Some(dir) = &summary.target_dir {
        println!(
            "  {} {}",
            "Target:".bright_black(),
            dir.display().to_string().cyan()
        );
    }
    if summary.extracted > 0 || summary.split_failures > 0 {
        println!(
            "  {} {} tracks split from CUE images",
            "Split:".bright_black(),
            summary.extracted.to_string().green().bold()
        );
    }
    println!(
        "  {} {} files",
        "Copied:".bright_black(),
        summary.copied.to_string().green().bold()
    );
    println!(
        "  {} {} files already in the library",
        "Skipped:".bright_black(),
        summary.skipped.to_string().yellow().bold()
    );
    if summary.deleted > 0 {
        println!(
            "  {} {} original files",
            "Deleted:".bright_black(),
            summary.deleted.to_string().green().bold()
        );
    }
    let errors = summary.failed + summary.split_failures + summary.delete_failures;
    if errors > 0 {
        println!(
            "  {} {} operations failed",
            "Errors:".bright_black(),
            errors.to_string().red().bold()
        );
    }
}
