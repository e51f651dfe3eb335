use musictl::cue::{self, find_pairs};
use musictl::import::report::print_cue_listing;
use musictl::utils::validation::validate_path_exists;
use std::error::Error;
use std::path::Path;

pub fn handle_cue(file: &str) -> Result<(), Box<dyn Error>> {
    let expanded = shellexpand::tilde(file);
    let path = Path::new(expanded.as_ref());
    validate_path_exists(path)?;

    let sheet = cue::parse_file(path)?;

    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let image = find_pairs(directory)
        .unwrap_or_default()
        .into_iter()
        .find(|pair| pair.cue_path.file_name() == path.file_name())
        .map(|pair| pair.audio_path);

    print_cue_listing(path, image.as_deref(), &sheet);
    Ok(())
}
