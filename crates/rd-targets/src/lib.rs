//! `rd-targets` — dispatch targets and the feeds that supply them.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`target`] | `Target`, `Severity`                                         |
//! | [`select`] | `select_target`, `select_target_where`                       |
//! | [`feed`]   | `TargetFeed` trait, `StaticFeed`, `HttpTargetFeed`, `CsvTargetFeed` |
//! | [`loader`] | `load_targets_csv`, `load_targets_reader`                    |
//! | [`board`]  | `TargetBoard` — last-known-good target set                   |
//! | [`error`]  | `FeedError`, `FeedResult<T>`                                 |
//!
//! # Priority policy
//!
//! Only active targets are eligible.  The highest severity wins; among equal
//! severities the target appearing first in the feed wins.  Feeds list the
//! most recently detected entries first, so ties favour newer reports.

pub mod board;
pub mod error;
pub mod feed;
pub mod loader;
pub mod select;
pub mod target;


pub use board::TargetBoard;
pub use error::{FeedError, FeedResult};
pub use feed::{CsvTargetFeed, HttpTargetFeed, StaticFeed, TargetFeed};
pub use loader::{load_targets_csv, load_targets_reader};
pub use select::{select_target, select_target_where};
pub use target::{Severity, Target};
