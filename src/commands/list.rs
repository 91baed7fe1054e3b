use anyhow::Result;
use onehack_core::hackathon::{Platform, retain_platform};
use owo_colors::OwoColorize;

use crate::app::App;
use crate::render::print_records;
use crate::utils::tui;

pub async fn run(app: &App, platform: Option<Platform>) -> Result<()> {
    if let Some(platform) = &platform
        && !platform.is_known()
    {
        let known: Vec<String> = Platform::KNOWN.iter().map(|p| p.as_str().to_string()).collect();
        anyhow::bail!(
            "Unknown platform '{}'. Available: {}",
            platform,
            known.join(", ")
        );
    }

    let records = match &platform {
        Some(platform) => {
            let spinner = tui::create_spinner(format!("Fetching {} hackathons", platform.display_name()));
            let result = app.fetcher.by_platform(platform).await;
            spinner.finish_and_clear();

            // The endpoint already filters; re-check in case it returns strays
            retain_platform(result?, platform)
        }
        None => {
            let spinner = tui::create_spinner("Fetching hackathons");
            let result = app.fetcher.all().await;
            spinner.finish_and_clear();
            result?
        }
    };

    if let Some(platform) = &platform {
        let heading = format!("{} hackathons", platform.display_name());
        match platform.homepage() {
            Some(homepage) => println!("{} {}\n", heading.bold(), homepage.dimmed()),
            None => println!("{}\n", heading.bold()),
        }
    }

    print_records(&records, "No hackathons found");

    Ok(())
}
