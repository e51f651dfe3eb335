use musictl::config::Config;
use std::error::Error;
use std::fs;

pub fn handle_init(base_path: Option<&str>) -> Result<(), Box<dyn Error>> {
    if Config::exists()? {
        return Err("musictl is already initialized. Use 'musictl config set base_path <path>' to change the library location.".into());
    }

    let mut config = Config::new();
    if let Some(base_path) = base_path {
        config.base_path = base_path.to_string();
    }

    let library = config.base_path()?;
    if library.exists() && !library.is_dir() {
        return Err(format!("{} exists but is not a directory", library.display()).into());
    }
    if !library.exists() {
        println!("Creating library directory: {}", library.display());
        fs::create_dir_all(&library)?;
    }

    config.save()?;

    println!("musictl initialized successfully!");
    println!("Library: {}", library.display());
    println!(
        "Music directories: {}",
        config.music_directories.join(", ")
    );
    println!(
        "Configuration saved to: {}",
        Config::config_path()?.display()
    );

    Ok(())
}
