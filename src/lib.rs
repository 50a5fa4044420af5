//! flightlist - flight search in the terminal
//!
//! The library exposes the app's modules for testing.

pub mod action;
pub mod airline_filter;
pub mod airlines;
pub mod api;
pub mod baggage;
pub mod compare;
pub mod components;
pub mod config;
pub mod criteria;
pub mod currency;
pub mod dates;
pub mod effect;
pub mod error;
pub mod form;
pub mod html;
pub mod itinerary;
pub mod logging;
pub mod logos;
pub mod reducer;
pub mod results;
pub mod state;
