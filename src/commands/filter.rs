use anyhow::Result;
use onehack_core::filter::FilterState;

use crate::app::App;
use crate::render::print_records;
use crate::utils::tui;

pub async fn run(app: &App, filters: &FilterState) -> Result<()> {
    let spinner = tui::create_spinner("Filtering hackathons");
    let result = app.fetcher.filter(filters).await;
    spinner.finish_and_clear();

    // Dates are not understood by the filter endpoint, so narrow here
    let records: Vec<_> = result?
        .into_iter()
        .filter(|r| filters.date_range.overlaps(r))
        .collect();

    print_records(
        &records,
        "No hackathons match these filters. Try adjusting them.",
    );

    Ok(())
}
