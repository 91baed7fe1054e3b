use anyhow::Result;
use chrono::Utc;
use onehack_core::hackathon::{HackathonRecord, partition_by_status};
use owo_colors::OwoColorize;

use crate::app::App;
use crate::render::render_card;
use crate::utils::tui;

pub async fn run(app: &App) -> Result<()> {
    let store = app.bookmark_store()?;

    let spinner = tui::create_spinner("Loading bookmarks");
    let result = store.try_load().await;
    spinner.finish_and_clear();

    if let Err(e) = result {
        println!("{}\n", format!("Could not refresh bookmarks: {e}").red());
    }

    let entries = store.entries();
    if entries.is_empty() {
        println!("{}", "No bookmarks yet. Add one with `onehack bookmark <id>`.".dimmed());
        return Ok(());
    }

    let now = Utc::now();
    let groups = partition_by_status(&entries, now);

    print_section("Live", &groups.live, now);
    print_section("Upcoming", &groups.upcoming, now);
    print_section("Ended", &groups.past, now);
    print_section("Undated", &groups.unknown, now);

    Ok(())
}

fn print_section(title: &str, records: &[HackathonRecord], now: chrono::DateTime<Utc>) {
    if records.is_empty() {
        return;
    }

    println!("{} {}", title.bold(), format!("({})", records.len()).dimmed());
    for record in records {
        println!("{}\n", render_card(record, now));
    }
}
