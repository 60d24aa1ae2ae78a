//! Hourly weather forecast client.
//!
//! Reads the `?format=j1` JSON of a wttr.in-style service. The forecast is decoration
//! on the task sheet, so [`WeatherClient::forecast`] never fails: timeouts, network
//! errors and unreadable payloads are logged and turn into `None`.

use crate::config::WeatherSettings;
use crate::constants::DATE_FORMAT_ISO;
use crate::errors::{AppResult, ServiceError};
use crate::services::{ensure_success, unreachable};
use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

const SERVICE: &str = "weather";
/// First hour at which clear skies get the night icon.
const NIGHT_STARTS_AT: u32 = 18;

/// Sky condition, grouped the way the icon set is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherKind {
    Sunny,
    PartlyCloudy,
    Cloudy,
    Rain,
    HeavyRain,
    Snow,
    HeavySnow,
}

impl WeatherKind {
    /// Maps a WWO weather code onto an icon group. Unknown codes count as clear.
    pub fn from_code(code: u32) -> Self {
        match code {
            116 => WeatherKind::PartlyCloudy,
            119 | 122 | 143 | 248 | 260 => WeatherKind::Cloudy,
            176 | 185 | 263 | 266 | 281 | 284 | 293 | 296 | 311 | 314 | 317 | 350 | 353 | 362
            | 365 | 374 | 377 => WeatherKind::Rain,
            200 | 299 | 302 | 305 | 308 | 356 | 359 | 386 | 389 => WeatherKind::HeavyRain,
            179 | 182 | 227 | 320 | 323 | 326 | 368 => WeatherKind::Snow,
            230 | 329 | 332 | 335 | 338 | 371 | 392 | 395 => WeatherKind::HeavySnow,
            _ => WeatherKind::Sunny,
        }
    }

    /// Icon file stem for this condition at `hour`.
    pub fn icon_name(self, hour: u32) -> &'static str {
        match self {
            WeatherKind::PartlyCloudy => "partially-cloudy",
            WeatherKind::Cloudy => "cloudy",
            WeatherKind::Rain => "rain",
            WeatherKind::HeavyRain => "heavy-rain",
            WeatherKind::Snow => "snow",
            WeatherKind::HeavySnow => "heavy-snow",
            WeatherKind::Sunny if hour >= NIGHT_STARTS_AT => "night",
            WeatherKind::Sunny => "sunny",
        }
    }
}

/// One forecast slot.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyForecast {
    pub hour: u32,
    /// Degrees Celsius.
    pub temperature: i32,
    pub feels_like: i32,
    pub kind: WeatherKind,
}

/// Forecast for one day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayForecast {
    pub date: NaiveDate,
    pub hourly: Vec<HourlyForecast>,
}

impl DayForecast {
    pub fn at_hour(&self, hour: u32) -> Option<&HourlyForecast> {
        self.hourly.iter().find(|slot| slot.hour == hour)
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    weather: Vec<RawDay>,
}

#[derive(Debug, Deserialize)]
struct RawDay {
    date: String,
    #[serde(default)]
    hourly: Vec<RawHour>,
}

#[derive(Debug, Deserialize)]
struct RawHour {
    /// "0", "300", ... "2100"
    time: String,
    #[serde(rename = "tempC")]
    temp_c: String,
    #[serde(rename = "FeelsLikeC")]
    feels_like_c: String,
    #[serde(rename = "weatherCode")]
    weather_code: String,
}

/// Client for the forecast service.
pub struct WeatherClient {
    base_url: String,
    location: String,
    client: Client,
}

impl WeatherClient {
    /// Builds a client whose requests give up after the configured timeout.
    pub fn new(settings: &WeatherSettings) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(unreachable(SERVICE))?;

        Ok(Self {
            base_url: settings.base_url.clone(),
            location: settings.location.clone(),
            client,
        })
    }

    /// Forecast for `date`, or `None` when the service cannot provide one.
    pub fn forecast(&self, date: NaiveDate) -> Option<DayForecast> {
        match self.fetch(date) {
            Ok(Some(forecast)) => Some(forecast),
            Ok(None) => {
                info!("No forecast available for {}", date);
                None
            }
            Err(e) => {
                warn!("Could not fetch the weather forecast: {}", e);
                None
            }
        }
    }

    fn fetch(&self, date: NaiveDate) -> AppResult<Option<DayForecast>> {
        let url = format!("{}/{}", self.base_url, self.location);
        debug!("Fetching forecast for {} from {}", date, url);

        let response = self
            .client
            .get(&url)
            .query(&[("format", "j1")])
            .send()
            .map_err(unreachable(SERVICE))?;
        let response = ensure_success(SERVICE, response)?;
        let body: ForecastResponse = response.json().map_err(|e| ServiceError::InvalidResponse {
            service: SERVICE,
            message: format!("Failed to parse forecast: {}", e),
        })?;

        Ok(body
            .weather
            .into_iter()
            .filter_map(parse_day)
            .find(|day| day.date == date))
    }
}

fn parse_day(raw: RawDay) -> Option<DayForecast> {
    let date = NaiveDate::parse_from_str(&raw.date, DATE_FORMAT_ISO).ok()?;
    let hourly = raw.hourly.iter().filter_map(parse_hour).collect();
    Some(DayForecast { date, hourly })
}

fn parse_hour(raw: &RawHour) -> Option<HourlyForecast> {
    let time: u32 = raw.time.trim().parse().ok()?;
    Some(HourlyForecast {
        hour: time / 100,
        temperature: raw.temp_c.trim().parse().ok()?,
        feels_like: raw.feels_like_c.trim().parse().ok()?,
        kind: WeatherKind::from_code(raw.weather_code.trim().parse().ok()?),
    })
}
