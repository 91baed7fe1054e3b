use anyhow::Result;
use onehack_core::config::OneHackConfig;
use onehack_core::credentials::Credentials;
use owo_colors::OwoColorize;

use crate::app::App;

pub fn run(app: &App) -> Result<()> {
    let config = &app.config;
    let credentials = Credentials::load()?;

    println!("{}", OneHackConfig::config_path()?.display().dimmed());
    println!("api_base          = {}", config.api_base);
    println!("bookmark_api_base = {}", config.bookmark_api_base);
    println!("cache_dir         = {}", config.cache_path().display());
    println!("storage_key       = {}", config.storage_key);
    println!(
        "refresh_interval  = {}",
        humantime::format_duration(config.refresh_interval)
    );
    println!(
        "request_timeout   = {}",
        humantime::format_duration(config.request_timeout)
    );
    println!(
        "logged in as      = {}",
        credentials.user_id.as_deref().unwrap_or("(nobody)")
    );

    Ok(())
}
