//! Exchange session gate for equity venues.

use chrono::{DateTime, Datelike, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use sigscan_data::BINANCE_VENUE;

const TIME_FORMAT: &str = "%H:%M";

/// Regular session hours. Venues outside `always_open` are only scanned inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketHours {
    pub enabled: bool,
    /// IANA zone name the session times are expressed in
    pub timezone: String,
    /// Session open, `HH:MM` local time
    pub open: String,
    /// Session close, `HH:MM` local time, inclusive
    pub close: String,
    /// Venues that trade around the clock
    pub always_open: Vec<String>,
}

impl Default for MarketHours {
    fn default() -> Self {
        Self {
            enabled: true,
            timezone: "America/New_York".to_string(),
            open: "09:30".to_string(),
            close: "16:00".to_string(),
            always_open: vec![BINANCE_VENUE.to_string()],
        }
    }
}

impl MarketHours {
    /// Resolve the zone and session times.
    pub fn gate(&self) -> Result<MarketGate, String> {
        let tz: Tz = self
            .timezone
            .parse()
            .map_err(|e| format!("scan.market_hours.timezone {:?}: {e}", self.timezone))?;
        let open = NaiveTime::parse_from_str(&self.open, TIME_FORMAT)
            .map_err(|e| format!("scan.market_hours.open {:?}: {e}", self.open))?;
        let close = NaiveTime::parse_from_str(&self.close, TIME_FORMAT)
            .map_err(|e| format!("scan.market_hours.close {:?}: {e}", self.close))?;
        if close <= open {
            return Err(format!(
                "scan.market_hours.close ({}) must be after open ({})",
                self.close, self.open
            ));
        }

        Ok(MarketGate {
            enabled: self.enabled,
            tz,
            open,
            close,
            always_open: self.always_open.iter().map(|v| v.to_uppercase()).collect(),
        })
    }
}

/// Resolved [`MarketHours`].
#[derive(Debug, Clone)]
pub struct MarketGate {
    enabled: bool,
    tz: Tz,
    open: NaiveTime,
    close: NaiveTime,
    always_open: Vec<String>,
}

impl MarketGate {
    /// A gate that lets every venue through.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            tz: Tz::UTC,
            open: NaiveTime::MIN,
            close: NaiveTime::MIN,
            always_open: Vec::new(),
        }
    }

    /// Weekday between open and close in the session's zone. Holidays are not modelled.
    pub fn in_session(&self, now: DateTime<Utc>) -> bool {
        let local = now.with_timezone(&self.tz);
        if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }
        let time = local.time();
        self.open <= time && time <= self.close
    }

    /// Whether `venue` may be fetched at `now`.
    pub fn allows(&self, venue: &str, now: DateTime<Utc>) -> bool {
        !self.enabled
            || self.always_open.iter().any(|v| v.eq_ignore_ascii_case(venue))
            || self.in_session(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_session_in_winter_and_summer() {
        let gate = MarketHours::default().gate().unwrap();

        // Monday 2024-01-15, EST is UTC-5
        assert!(gate.in_session(utc(2024, 1, 15, 14, 30)));
        assert!(gate.in_session(utc(2024, 1, 15, 21, 0)));
        assert!(!gate.in_session(utc(2024, 1, 15, 14, 29)));
        assert!(!gate.in_session(utc(2024, 1, 15, 21, 1)));

        // Monday 2024-07-15, EDT is UTC-4
        assert!(gate.in_session(utc(2024, 7, 15, 13, 45)));
        assert!(!gate.in_session(utc(2024, 7, 15, 13, 15)));
    }

    #[test]
    fn test_weekend_is_closed() {
        let gate = MarketHours::default().gate().unwrap();
        // Saturday 2024-01-13, midday in New York
        assert!(!gate.in_session(utc(2024, 1, 13, 17, 0)));
    }

    #[test]
    fn test_allows_crypto_when_closed() {
        let gate = MarketHours::default().gate().unwrap();
        let sunday = utc(2024, 1, 14, 17, 0);

        assert!(gate.allows("BINANCE", sunday));
        assert!(gate.allows("binance", sunday));
        assert!(!gate.allows("NASDAQ", sunday));
        assert!(gate.allows("NASDAQ", utc(2024, 1, 15, 17, 0)));
    }

    #[test]
    fn test_disabled_gate_allows_everything() {
        let settings = MarketHours {
            enabled: false,
            ..Default::default()
        };
        let sunday = utc(2024, 1, 14, 17, 0);
        assert!(settings.gate().unwrap().allows("NYSE", sunday));
        assert!(MarketGate::disabled().allows("NYSE", sunday));
    }

    #[test]
    fn test_rejects_bad_settings() {
        let bad_zone = MarketHours {
            timezone: "Mars/Olympus".into(),
            ..Default::default()
        };
        assert!(bad_zone.gate().is_err());

        let inverted = MarketHours {
            open: "16:00".into(),
            close: "09:30".into(),
            ..Default::default()
        };
        assert!(inverted.gate().is_err());

        let garbled = MarketHours {
            open: "half past nine".into(),
            ..Default::default()
        };
        assert!(garbled.gate().is_err());
    }
}
