//! Local browser-history mining for educational engagement.
//!
//! History is read from the Safari, Chrome, Firefox and Brave databases on
//! this machine ([`history`]), each visited URL is split into components and
//! classified ([`normalize`], [`classify`]), and two normalized histories can
//! be scored against each other ([`similarity`]). Nothing leaves the machine
//! except the files written by [`pipeline`].

pub mod classify;
pub mod cli;
pub mod config;
pub mod history;
pub mod logging;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod privacy;
pub mod schedule;
pub mod similarity;
pub mod title;
pub mod util;
