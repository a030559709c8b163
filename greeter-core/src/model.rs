use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Current conditions for a single city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location_name: String,
    pub country: String,
    pub temperature_c: f64,
    pub temperature_f: f64,
    pub condition: String,
    pub wind_kph: f64,
    pub observation_time: Option<DateTime<Utc>>,
}

impl fmt::Display for WeatherReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "📍 Location:     {}, {}", self.location_name, self.country)?;
        writeln!(
            f,
            "🌡️ Temperature:  {}°C / {}°F",
            self.temperature_c, self.temperature_f
        )?;
        writeln!(f, "🌤️ Condition:    {}", self.condition)?;
        write!(f, "💨 Wind:         {} kph", self.wind_kph)?;
        if let Some(observed) = self.observation_time {
            write!(f, "\n🕒 Updated:      {}", observed.format("%Y-%m-%d %H:%M UTC"))?;
        }
        Ok(())
    }
}
