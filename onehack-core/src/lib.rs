//! Core library for onehack.
//!
//! - `fetcher` queries the hackathon listing API
//! - `bookmarks` keeps the user's saved hackathons in sync between a local
//!   cache and the remote bookmark service
//! - `hackathon` and `filter` hold the shared data types

pub mod bookmark_api;
pub mod bookmarks;
pub mod calendar;
pub mod config;
pub mod credentials;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod hackathon;
mod http;
pub mod identity;
pub mod storage;

pub use error::{OneHackError, OneHackResult};
