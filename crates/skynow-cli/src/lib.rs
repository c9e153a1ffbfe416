pub mod config;
pub mod model;
pub mod position;
pub mod prefs;
pub mod providers;
pub mod service;
pub mod units;
pub mod view;
pub mod weather_code;
