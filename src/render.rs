//! Terminal rendering for onehack-core types.
//!
//! Extension traits that add colored output using owo_colors.

use chrono::{DateTime, Utc};
use onehack_core::hackathon::{HackathonRecord, HackathonStatus, Platform};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Platform {
    fn render(&self) -> String {
        let tag = format!("[{}]", self.as_str());
        match self {
            Platform::Devfolio => tag.blue().to_string(),
            Platform::Devpost => tag.green().to_string(),
            Platform::Unstop => tag.magenta().to_string(),
            Platform::Dorahacks => tag.yellow().to_string(),
            // Fallback style for platforms we don't know about
            Platform::Other(_) => tag.cyan().to_string(),
        }
    }
}

impl Render for HackathonStatus {
    fn render(&self) -> String {
        match self {
            HackathonStatus::Live => self.label().green().bold().to_string(),
            HackathonStatus::Upcoming => self.label().blue().to_string(),
            HackathonStatus::Past => self.label().dimmed().to_string(),
        }
    }
}

/// Multi-line card for one hackathon, relative to `now`.
pub fn render_card(record: &HackathonRecord, now: DateTime<Utc>) -> String {
    let mut header = format!("{} {}", record.title.bold(), record.platform.render());

    if let Some(status) = record.status_at(now) {
        header.push_str(&format!(" {}", status.render()));

        if status == HackathonStatus::Upcoming
            && let Some(days) = record.days_until_start(now)
        {
            let label = format!("{} {} to go", days, pluralize("day", days));
            header.push_str(&format!(" {}", label.dimmed()));
        }
    }

    let mut lines = vec![header];
    lines.push(format!("   {} · {}", render_dates(record), record.mode));

    if let Some(prize) = &record.prize_pool {
        lines.push(format!("   Prize pool: {}", prize));
    }

    if !record.tags.is_empty() {
        lines.push(format!("   {}", record.tags.join(", ").dimmed()));
    }

    lines.push(format!("   {}", record.url.underline()));

    if let Some(id) = &record.id {
        lines.push(format!("   {}", format!("id: {id}").dimmed()));
    }

    lines.join("\n")
}

/// Print cards separated by blank lines, or a hint when there is nothing.
pub fn print_records(records: &[HackathonRecord], empty_message: &str) {
    if records.is_empty() {
        println!("{}", empty_message.dimmed());
        return;
    }

    let now = Utc::now();
    let cards: Vec<String> = records.iter().map(|r| render_card(r, now)).collect();
    println!("{}", cards.join("\n\n"));
}

fn render_dates(record: &HackathonRecord) -> String {
    match (record.starts_at(), record.ends_at()) {
        (Some(start), Some(end)) => format!(
            "{} - {}",
            start.format("%b %d"),
            end.format("%b %d, %Y")
        ),
        _ => format!("{} - {}", record.start_date, record.end_date),
    }
}

fn pluralize(word: &str, count: i64) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
