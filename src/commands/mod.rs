pub mod bookmark;
pub mod bookmarks;
pub mod calendar;
pub mod config;
pub mod filter;
pub mod list;
pub mod login;
pub mod logout;
pub mod search;
pub mod sync;
pub mod watch;
