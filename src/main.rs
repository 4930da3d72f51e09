use std::sync::Arc;
use actix_web::{web, App, HttpServer};
use log::info;
use tokio::sync::{watch, Mutex};
use weatherwatch::errors::UnrecoverableError;
use weatherwatch::initialization::config;
use weatherwatch::manager_db::DB;
use weatherwatch::manager_email::Emailer;
use weatherwatch::manager_poller::{run_polling, PollSettings};
use weatherwatch::manager_weather::WeatherApi;
use weatherwatch::unit_conversion::Units;
use weatherwatch::view::WeatherView;
use weatherwatch::{handlers, AppState};

#[actix_web::main]
async fn main() -> Result<(), UnrecoverableError> {
    let config = config()?;

    let db = Arc::new(Mutex::new(DB::new(&config.db.db_path)?));
    let weather = Arc::new(WeatherApi::new(&config.weather_api.api_url, &config.weather_api.api_key)?);
    let emailer = Arc::new(Emailer::new(
        &config.email_api.api_url,
        &config.email_api.service_id,
        &config.email_api.template_id,
        &config.email_api.user_id,
    )?);
    let view = Arc::new(Mutex::new(WeatherView::default()));

    let (settings_tx, settings_rx) = watch::channel(
        PollSettings::new(Units::Metric, config.poller.interval_minutes),
    );
    let settings = Arc::new(settings_tx);

    tokio::spawn(run_polling(
        db.clone(),
        weather.clone(),
        emailer.clone(),
        view.clone(),
        config.poller.cities.clone(),
        settings_rx,
    ));

    info!(
        "starting weatherwatch on {}:{}",
        config.web_server.bind_address, config.web_server.bind_port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(AppState {
                db: db.clone(),
                weather: weather.clone(),
                emailer: emailer.clone(),
                view: view.clone(),
                settings: settings.clone(),
            }))
            .service(handlers::current_weather)
            .service(handlers::current_view)
            .service(handlers::summaries)
            .service(handlers::alerts)
            .service(handlers::settings)
            .service(handlers::update_settings)
            .service(handlers::poll_settings)
            .service(handlers::update_poll)
            .service(handlers::generate_summary)
    })
        .bind((config.web_server.bind_address, config.web_server.bind_port))?
        .run()
        .await?;

    Ok(())
}
