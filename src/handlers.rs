use actix_web::{get, post, web, HttpResponse, Responder};
use log::{error, info, warn};
use serde::Deserialize;
use crate::manager_db::StateStore;
use crate::manager_poller::PollSettings;
use crate::manager_summary;
use crate::manager_summary::models::SettingsEdit;
use crate::manager_weather::WeatherQuery;
use crate::unit_conversion::Units;
use crate::view::WeatherView;
use crate::AppState;

// six cities worth of chart history
const DEFAULT_SUMMARY_LIMIT: usize = 90;

#[derive(Deserialize, Debug)]
struct WeatherParams {
    city: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Deserialize, Debug)]
struct SummaryParams {
    limit: Option<usize>,
}

#[derive(Deserialize, Debug)]
struct PollUpdate {
    units: Option<Units>,
    interval_minutes: Option<u64>,
}

/// On-demand lookup for a single city or coordinate pair. The result
/// replaces the displayed selection but is not added to the batch history.
#[get("/weather")]
pub async fn current_weather(params: web::Query<WeatherParams>, data: web::Data<AppState>) -> impl Responder {
    info!("{:?}", params);

    let query = match (&params.city, params.lat, params.lon) {
        (Some(city), _, _) => WeatherQuery::City(city.clone()),
        (None, Some(lat), Some(lon)) => WeatherQuery::Coord { lat, lon },
        _ => return HttpResponse::BadRequest().body("expected city or lat and lon"),
    };

    let units = data.settings.borrow().units;
    match data.weather.current(&query, units).await {
        Ok(record) => {
            info!("fetched weather for {}, {}", record.city, record.country);
            *data.view.lock().await = WeatherView::Single(record.clone());
            HttpResponse::Ok().json(record)
        }
        Err(e) => {
            error!("failed to fetch weather: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/view")]
pub async fn current_view(data: web::Data<AppState>) -> impl Responder {
    let view = data.view.lock().await.clone();
    HttpResponse::Ok().json(view)
}

#[get("/summaries")]
pub async fn summaries(params: web::Query<SummaryParams>, data: web::Data<AppState>) -> impl Responder {
    let limit = params.limit.unwrap_or(DEFAULT_SUMMARY_LIMIT);

    let db = data.db.lock().await;
    match db.recent_summaries(limit) {
        Ok(summaries) => HttpResponse::Ok().json(summaries),
        Err(e) => {
            error!("failed to read summary history: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/alerts")]
pub async fn alerts(data: web::Data<AppState>) -> impl Responder {
    let db = data.db.lock().await;
    HttpResponse::Ok().json(db.load_config().alerts)
}

#[get("/settings")]
pub async fn settings(data: web::Data<AppState>) -> impl Responder {
    let db = data.db.lock().await;
    HttpResponse::Ok().json(db.load_config())
}

/// Updates the alert configuration. Editing threshold, unit or email
/// restarts the consecutive-exceedance tracking, adding a watch-list city
/// does not.
#[post("/settings")]
pub async fn update_settings(body: web::Json<SettingsEdit>, data: web::Data<AppState>) -> impl Responder {
    info!("{:?}", body);

    let db = data.db.lock().await;
    let mut config = db.load_config();
    config.apply_edit(&body);

    match db.save_config(&config) {
        Ok(_) => HttpResponse::Ok().json(config),
        Err(e) => {
            error!("failed to save user settings: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/poll")]
pub async fn poll_settings(data: web::Data<AppState>) -> impl Responder {
    let current_settings = *data.settings.borrow();
    HttpResponse::Ok().json(current_settings)
}

/// Updates the active unit system and/or polling interval. Any change wakes
/// the polling loop for an immediate refetch.
#[post("/poll")]
pub async fn update_poll(body: web::Json<PollUpdate>, data: web::Data<AppState>) -> impl Responder {
    info!("{:?}", body);

    let current = *data.settings.borrow();
    let updated = PollSettings::new(
        body.units.unwrap_or(current.units),
        body.interval_minutes.unwrap_or(current.interval_minutes),
    );

    match data.settings.send(updated) {
        Ok(_) => HttpResponse::Ok().json(updated),
        Err(e) => {
            error!("polling loop is gone: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Builds and records summaries for whatever is currently displayed and runs
/// threshold evaluation on them, dispatching an alert mail on escalation.
#[post("/summary")]
pub async fn generate_summary(data: web::Data<AppState>) -> impl Responder {
    let records = data.view.lock().await.records();
    if records.is_empty() {
        return HttpResponse::Ok().json(Vec::<manager_summary::models::DailySummary>::new());
    }

    let units = data.settings.borrow().units;
    let outcome = {
        let db = data.db.lock().await;
        manager_summary::process_batch(&*db, &records, units)
    };

    match outcome {
        Ok(outcome) => {
            if outcome.notify {
                if let Err(e) = data.emailer.send(&outcome.email, &outcome.breaching).await {
                    warn!("failed to send alert mail: {}", e);
                }
            }
            HttpResponse::Ok().json(outcome.summaries)
        }
        Err(e) => {
            error!("error while processing summary batch: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}
