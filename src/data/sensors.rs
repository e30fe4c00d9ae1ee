//! Static display data for the monitoring screens. The sensor catalog,
//! alerts and reading series are client-side stand-ins; nothing here is
//! persisted or mutated beyond the page session.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde_derive::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorModel {
    Em310,
    Em500,
    Ws302,
}

impl SensorModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorModel::Em310 => "EM310",
            SensorModel::Em500 => "EM500",
            SensorModel::Ws302 => "WS302",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Water,
    Air,
    Sound,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Water => "Agua",
            Category::Air => "Aire",
            Category::Sound => "Sonido",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorStatus {
    Normal,
    Warning,
    Critical,
}

impl SensorStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SensorStatus::Normal => "Normal",
            SensorStatus::Warning => "Advertencia",
            SensorStatus::Critical => "Crítico",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sensor {
    pub id: String,
    pub name: String,
    pub model: SensorModel,
    pub location: String,
    pub lat: f64,
    pub lng: f64,
    pub status: SensorStatus,
    pub battery: u8,
    pub last_reading: DateTime<Utc>,
    pub current_value: f64,
    pub unit: &'static str,
    pub category: Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertSeverity {
    Warning,
    Critical,
}

#[derive(Debug, Clone)]
pub struct Alert {
    pub id: String,
    pub sensor: String,
    pub message: String,
    pub severity: AlertSeverity,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

fn sensor(
    id: &str,
    name: &str,
    model: SensorModel,
    location: &str,
    (lat, lng): (f64, f64),
    status: SensorStatus,
    battery: u8,
    current_value: f64,
    unit: &'static str,
    category: Category,
) -> Sensor {
    Sensor {
        id: id.to_string(),
        name: name.to_string(),
        model,
        location: location.to_string(),
        lat,
        lng,
        status,
        battery,
        last_reading: Utc::now(),
        current_value,
        unit,
        category,
    }
}

/// The municipal network as shown on every screen.
pub fn catalog() -> Vec<Sensor> {
    use Category::*;
    use SensorModel::*;
    use SensorStatus::*;
    vec![
        sensor(
            "1",
            "Sensor Agua Laguna Alalay",
            Em310,
            "Av. Alalay, Cochabamba",
            (-17.3895, -66.1568),
            Normal,
            85,
            3.2,
            "m",
            Water,
        ),
        sensor(
            "2",
            "Sensor CO₂ Plaza Colón",
            Em500,
            "Plaza 14 de Septiembre, Cochabamba",
            (-17.3935, -66.1570),
            Warning,
            72,
            425.0,
            "ppm",
            Air,
        ),
        sensor(
            "3",
            "Sensor Ruido Av. Heroínas",
            Ws302,
            "Av. Heroínas esq. Ayacucho",
            (-17.3945, -66.1575),
            Critical,
            45,
            78.0,
            "dB",
            Sound,
        ),
        sensor(
            "4",
            "Sensor Temperatura Tunari",
            Em500,
            "Parque Nacional Tunari",
            (-17.2850, -66.2100),
            Normal,
            91,
            18.5,
            "°C",
            Air,
        ),
        sensor(
            "5",
            "Sensor Agua Río Rocha",
            Em310,
            "Puente Libertador, Río Rocha",
            (-17.4100, -66.1600),
            Warning,
            68,
            1.8,
            "m",
            Water,
        ),
        sensor(
            "6",
            "Sensor CO₂ Zona Sur",
            Em500,
            "Av. América, Zona Sur",
            (-17.4200, -66.1450),
            Normal,
            88,
            390.0,
            "ppm",
            Air,
        ),
        sensor(
            "7",
            "Sensor Ruido Terminal",
            Ws302,
            "Terminal de Buses",
            (-17.3650, -66.1780),
            Warning,
            55,
            72.0,
            "dB",
            Sound,
        ),
        sensor(
            "8",
            "Sensor Humedad Cristo",
            Em500,
            "Cristo de la Concordia",
            (-17.3650, -66.1950),
            Normal,
            94,
            62.0,
            "%",
            Air,
        ),
    ]
}

pub fn active_alerts() -> Vec<Alert> {
    let now = Utc::now();
    vec![
        Alert {
            id: "1".to_string(),
            sensor: "Sensor Ruido Av. Heroínas".to_string(),
            message: "Nivel de ruido crítico: 78 dB".to_string(),
            severity: AlertSeverity::Critical,
            timestamp: now - Duration::minutes(15),
        },
        Alert {
            id: "2".to_string(),
            sensor: "Sensor CO₂ Plaza Colón".to_string(),
            message: "CO₂ elevado: 425 ppm".to_string(),
            severity: AlertSeverity::Warning,
            timestamp: now - Duration::minutes(30),
        },
        Alert {
            id: "3".to_string(),
            sensor: "Sensor Agua Río Rocha".to_string(),
            message: "Nivel de agua bajo: 1.8m".to_string(),
            severity: AlertSeverity::Warning,
            timestamp: now - Duration::minutes(45),
        },
    ]
}

/// 24 hourly readings around the sensor's current value with ±10% uniform
/// jitter, oldest first, rounded to one decimal.
pub fn hourly_readings(sensor: &Sensor) -> Vec<Reading> {
    let mut rng = rand::thread_rng();
    let now = Utc::now();
    let base = sensor.current_value;
    let variance = base * 0.2;
    (0..24)
        .rev()
        .map(|i| {
            let jitter: f64 = rng.gen_range(-0.5..0.5);
            Reading {
                timestamp: now - Duration::hours(i),
                value: ((base + jitter * variance) * 10.0).round() / 10.0,
            }
        })
        .collect()
}

/// Average of the current values of all sensors reporting in `unit`,
/// rounded to one decimal; 0 when no sensor matches.
pub fn unit_average(sensors: &[Sensor], unit: &str) -> f64 {
    let values: Vec<f64> = sensors
        .iter()
        .filter(|s| s.unit == unit)
        .map(|s| s.current_value)
        .collect();
    if values.is_empty() {
        return 0.0;
    }
    let avg = values.iter().sum::<f64>() / values.len() as f64;
    (avg * 10.0).round() / 10.0
}

/// Search matches name, model or location, case-insensitively.
pub fn matches_search(sensor: &Sensor, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let q = query.to_lowercase();
    sensor.name.to_lowercase().contains(&q)
        || sensor.model.as_str().to_lowercase().contains(&q)
        || sensor.location.to_lowercase().contains(&q)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: usize,
    pub normal: usize,
    pub warning: usize,
    pub critical: usize,
}

pub fn status_counts<'a>(sensors: impl Iterator<Item = &'a Sensor>) -> StatusCounts {
    let mut counts = StatusCounts {
        total: 0,
        normal: 0,
        warning: 0,
        critical: 0,
    };
    for s in sensors {
        counts.total += 1;
        match s.status {
            SensorStatus::Normal => counts.normal += 1,
            SensorStatus::Warning => counts.warning += 1,
            SensorStatus::Critical => counts.critical += 1,
        }
    }
    counts
}

#[derive(Debug, Clone, Copy)]
pub struct SeriesStats {
    pub avg: f64,
    pub max: f64,
    pub min: f64,
}

pub fn series_stats(readings: &[Reading]) -> Option<SeriesStats> {
    if readings.is_empty() {
        return None;
    }
    let mut max = f64::MIN;
    let mut min = f64::MAX;
    let mut sum = 0.0;
    for r in readings {
        sum += r.value;
        max = max.max(r.value);
        min = min.min(r.value);
    }
    Some(SeriesStats {
        avg: sum / readings.len() as f64,
        max,
        min,
    })
}

/// One synthetic point per parameter for the dashboard and report charts.
#[derive(Debug, Clone)]
pub struct ParameterSample {
    pub label: String,
    pub temperatura: f64,
    pub co2: f64,
    pub ruido: f64,
    pub agua: f64,
}

/// Hourly samples for the last 24 hours, oldest first.
pub fn hourly_samples() -> Vec<ParameterSample> {
    let mut rng = rand::thread_rng();
    let now = Utc::now();
    (0..24)
        .rev()
        .map(|i| {
            let ts = now - Duration::hours(i);
            ParameterSample {
                label: ts.format("%H:00").to_string(),
                temperatura: 16.0 + rng.gen_range(0.0..8.0),
                co2: 380.0 + rng.gen_range(0.0..60.0),
                ruido: 55.0 + rng.gen_range(0.0..20.0),
                agua: 2.0 + rng.gen_range(0.0..2.0),
            }
        })
        .collect()
}

/// Daily samples for the report range, oldest first.
pub fn daily_samples(days: u32) -> Vec<ParameterSample> {
    let mut rng = rand::thread_rng();
    let now = Utc::now();
    (0..days as i64)
        .rev()
        .map(|i| {
            let ts = now - Duration::days(i);
            ParameterSample {
                label: ts.format("%d %b").to_string(),
                temperatura: 16.0 + rng.gen_range(0.0..8.0),
                co2: 380.0 + rng.gen_range(0.0..60.0),
                ruido: 55.0 + rng.gen_range(0.0..20.0),
                agua: 2.0 + rng.gen_range(0.0..2.0),
            }
        })
        .collect()
}

/// "Hace N minutos" / "Hace N horas", falling back to the date beyond a day.
pub fn relative_timestamp(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - ts).num_minutes().max(0);
    if minutes < 60 {
        format!("Hace {} minutos", minutes)
    } else if minutes < 1440 {
        format!("Hace {} horas", minutes / 60)
    } else {
        ts.format("%d/%m/%Y").to_string()
    }
}
