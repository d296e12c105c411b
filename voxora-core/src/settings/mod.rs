pub mod config;
pub mod manager;


pub use config::{ApiSettings, OutputSettings, Settings, SpeechDefaults};
pub use manager::SettingsManager;
