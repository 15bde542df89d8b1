//! Region check run before the stopwatch screen is shown.
//!
//! A match never aborts the process; it yields [`LaunchRoute::RestartRequested`]
//! and the shell decides what a restart means.

use crate::settings::GateSettings;

const CARRIER_ENV: &str = "STOPWATCH_CARRIER_COUNTRY";
const TIME_ZONE_ENV: &str = "STOPWATCH_TIME_ZONE";
const COUNTRY_ENV: &str = "STOPWATCH_COUNTRY";

/// Platform lookups the gate depends on. `None`/empty means unknown.
pub trait RegionProbe {
    /// ISO country code of the cellular carrier, e.g. "ir".
    fn carrier_country(&self) -> Option<String>;
    /// Localized name of the current time zone.
    fn time_zone(&self) -> Option<String>;
    /// Countries of the reverse-geocoded placemarks for the current location.
    fn placemark_countries(&self) -> Vec<String>;
}

/// Reads the region from `STOPWATCH_*` environment variables.
pub struct EnvProbe;

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl RegionProbe for EnvProbe {
    fn carrier_country(&self) -> Option<String> {
        env_value(CARRIER_ENV)
    }

    fn time_zone(&self) -> Option<String> {
        env_value(TIME_ZONE_ENV)
    }

    fn placemark_countries(&self) -> Vec<String> {
        env_value(COUNTRY_ENV).into_iter().collect()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RestartReason {
    Carrier,
    Placemark,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LaunchRoute {
    Stopwatch,
    RestartRequested(RestartReason),
}

pub struct LaunchGate<'a> {
    settings: &'a GateSettings,
}

impl<'a> LaunchGate<'a> {
    pub fn new(settings: &'a GateSettings) -> Self {
        Self { settings }
    }

    pub fn evaluate(&self, probe: &dyn RegionProbe) -> LaunchRoute {
        if !self.settings.enabled {
            return LaunchRoute::Stopwatch;
        }

        // Carrier only counts together with the matching time zone.
        let carrier = probe
            .carrier_country()
            .map(|c| c.eq_ignore_ascii_case(&self.settings.carrier_country))
            .unwrap_or(false);
        let zone = probe
            .time_zone()
            .map(|z| z == self.settings.time_zone)
            .unwrap_or(false);
        if carrier && zone {
            log::warn!("carrier and time zone match {}", self.settings.carrier_country);
            return LaunchRoute::RestartRequested(RestartReason::Carrier);
        }

        if probe
            .placemark_countries()
            .iter()
            .any(|c| *c == self.settings.country)
        {
            log::warn!("placemark country matches {}", self.settings.country);
            return LaunchRoute::RestartRequested(RestartReason::Placemark);
        }

        log::info!("launch gate passed");
        LaunchRoute::Stopwatch
    }
}
