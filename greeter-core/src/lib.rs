//! Core library for the `weather-greeter` CLI.
//!
//! This crate defines:
//! - Durable profile storage and the write-through user profile
//! - Input validation for usernames and cities
//! - The interactive session state machine
//! - Abstraction over the weather provider (WeatherAPI.com)
//!
//! It is used by `greeter-cli`, which supplies the terminal presentation.

pub mod config;
pub mod model;
pub mod profile;
pub mod provider;
pub mod session;
pub mod store;
pub mod validate;

pub use config::AppConfig;
pub use model::WeatherReport;
pub use profile::UserProfile;
pub use provider::{WeatherError, WeatherProvider, provider_from_config, weatherapi::WeatherApiProvider};
pub use session::{
    Console, MenuAction, Question, SessionController, SessionEvent, SessionState, SessionSummary,
    transition,
};
pub use store::{FileProfileStore, MemoryProfileStore, ProfileKey, ProfileStore, StoreError};
pub use validate::{ValidationError, validate_city, validate_username};
