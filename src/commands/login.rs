use anyhow::Result;
use dialoguer::Input;
use onehack_core::credentials::Credentials;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::identity::prompt_token;

pub async fn run(app: &App, user_id: Option<String>, token: Option<String>) -> Result<()> {
    let user_id = match user_id {
        Some(id) => id,
        None => Input::<String>::new()
            .with_prompt("User id")
            .validate_with(|input: &String| {
                if input.trim().is_empty() {
                    Err("A user id is required")
                } else {
                    Ok(())
                }
            })
            .interact_text()?,
    };
    let user_id = user_id.trim().to_string();
    if user_id.is_empty() {
        anyhow::bail!("A user id is required");
    }

    let token = match token {
        Some(token) => token,
        None => prompt_token().await?,
    };

    let credentials = Credentials {
        user_id: Some(user_id.clone()),
        access_token: Some(token),
    };
    credentials.save()?;

    println!("Logged in as {}", user_id.bold());

    let store = app.bookmark_store()?;
    match store.try_load().await {
        Ok(()) => println!("Synced {} bookmark(s).", store.entries().len()),
        Err(e) => println!("{}", format!("Could not fetch bookmarks: {e}").red()),
    }

    Ok(())
}
