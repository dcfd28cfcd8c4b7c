//! State containers for the home screen of an RSS reader.
//!
//! [`ui::home::HomeViewModel`] receives events, derives an observable
//! [`ui::home::HomeState`] from a [`repository::RssRepository`], and emits
//! one-shot [`ui::home::HomeEffect`]s. The [`flow`] module holds the
//! reactive plumbing it is built from.

pub mod config;
pub mod dispatchers;
pub mod flow;
pub mod lifecycle;
pub mod logging;
pub mod model;
pub mod repository;
pub mod ui;
