pub mod errors;
pub mod logging;
pub mod initialization;
pub mod handlers;
pub mod view;
pub mod unit_conversion;
pub mod manager_db;
pub mod manager_email;
pub mod manager_poller;
pub mod manager_summary;
pub mod manager_weather;

use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use crate::manager_db::DB;
use crate::manager_email::Emailer;
use crate::manager_poller::PollSettings;
use crate::manager_weather::WeatherApi;
use crate::view::WeatherView;

/// Shared state handed to every request handler.
pub struct AppState {
    pub db: Arc<Mutex<DB>>,
    pub weather: Arc<WeatherApi>,
    pub emailer: Arc<Emailer>,
    pub view: Arc<Mutex<WeatherView>>,
    pub settings: Arc<watch::Sender<PollSettings>>,
}
