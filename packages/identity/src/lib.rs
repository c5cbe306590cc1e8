#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Player identity and display-name formatting.
//!
//! [`player_key`] turns any scraped display name into the [`PlayerKey`]
//! used to join rows across sites. [`format_team`] and [`title_case`]
//! produce the display strings written to the output tables.

pub mod format;
pub mod key;

pub use format::{format_team, title_case};
pub use hoops_models::PlayerKey;
pub use key::player_key;
