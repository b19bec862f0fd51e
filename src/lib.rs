//! Client core for a football club website.
//!
//! The crate talks to the club's JSON API ([`api`]), keeps server data
//! in a keyed cache with staleness and request dedup ([`query`]), runs
//! writes through single-flight mutations, and models every page of the
//! site as plain state + intents ([`pages`]). Route access is decided
//! from the session alone ([`routes`]), so the console front end in
//! [`cli`] stays a thin shell.

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod logging;
pub mod notify;
pub mod pages;
pub mod query;
pub mod routes;
pub mod session;
