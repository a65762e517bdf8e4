//! Client for the iTunes Connect reporting service, modelled after Apple's Reporter tool.
//!
//! Queries are built as [`command::Query`] values, encoded by [`request::encode_request`] and
//! sent through a [`service::ReportLoader`]. Report dates for multi report downloads come from
//! [`calendar::DateRange`].

pub mod calendar;
pub mod command;
pub mod config;
pub mod error;
pub mod keychain;
pub mod model;
pub mod output;
pub mod progress;
pub mod request;
pub mod service;
pub mod token;
pub mod validate;
