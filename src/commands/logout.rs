use anyhow::Result;

use onehack_core::credentials::Credentials;

pub fn run() -> Result<()> {
    Credentials::clear()?;
    println!("Logged out. Bookmarks stay in the local cache.");
    Ok(())
}
