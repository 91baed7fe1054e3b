use anyhow::Result;

use crate::app::App;
use crate::render::print_records;
use crate::utils::tui;

pub async fn run(app: &App, query: &str) -> Result<()> {
    let spinner = tui::create_spinner(format!("Searching for \"{query}\""));
    let result = app.fetcher.search(query).await;
    spinner.finish_and_clear();

    print_records(
        &result?,
        "No hackathons match your search. Try different terms.",
    );

    Ok(())
}
