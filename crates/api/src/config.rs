//! Application configuration loaded from environment variables.

use ledger::{DEFAULT_TTL_SECS, FlightId, StaticCapacity, UnknownFlightPolicy};

const DEFAULT_SEED: &str = "AI202=14,6E310=10,UK811=8";

/// Server and ledger configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `8086`)
/// - `APP_ENV` — environment name reported by health probes (default: `"Development"`)
/// - `INVENTORY_DEFAULT_TTL_SECS` — hold TTL when a request has none (default: `600`)
/// - `INVENTORY_SWEEP_INTERVAL_SECS` — expiry sweep period, `0` disables (default: `30`)
/// - `INVENTORY_SEED` — `FLIGHT=SEATS` pairs separated by commas
/// - `INVENTORY_UNKNOWN_FLIGHT` — `zero`, `reject` or `default:<seats>` (default: `zero`)
///
/// Malformed values fall back to their defaults with a warning.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub default_ttl_secs: i64,
    pub sweep_interval_secs: u64,
    pub seed: StaticCapacity,
    pub unknown_flight: UnknownFlightPolicy,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", lookup("PORT"), defaults.port),
            environment: lookup("APP_ENV").unwrap_or(defaults.environment),
            default_ttl_secs: match parse_or(
                "INVENTORY_DEFAULT_TTL_SECS",
                lookup("INVENTORY_DEFAULT_TTL_SECS"),
                defaults.default_ttl_secs,
            ) {
                secs if secs > 0 => secs,
                _ => defaults.default_ttl_secs,
            },
            sweep_interval_secs: parse_or(
                "INVENTORY_SWEEP_INTERVAL_SECS",
                lookup("INVENTORY_SWEEP_INTERVAL_SECS"),
                defaults.sweep_interval_secs,
            ),
            seed: lookup("INVENTORY_SEED")
                .map(|raw| parse_seed(&raw))
                .unwrap_or(defaults.seed),
            unknown_flight: parse_or(
                "INVENTORY_UNKNOWN_FLIGHT",
                lookup("INVENTORY_UNKNOWN_FLIGHT"),
                defaults.unknown_flight,
            ),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8086,
            environment: "Development".to_string(),
            default_ttl_secs: DEFAULT_TTL_SECS,
            sweep_interval_secs: 30,
            seed: parse_seed(DEFAULT_SEED),
            unknown_flight: UnknownFlightPolicy::default(),
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, %value, "invalid configuration value, using default");
            default
        }),
        None => default,
    }
}

/// Parses `FLIGHT=SEATS` pairs, skipping malformed entries.
fn parse_seed(raw: &str) -> StaticCapacity {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let parsed = entry.split_once('=').and_then(|(flight, seats)| {
                let flight = flight.trim();
                let seats = seats.trim().parse::<u32>().ok()?;
                (!flight.is_empty()).then(|| (FlightId::new(flight), seats))
            });
            if parsed.is_none() {
                tracing::warn!(entry, "skipping malformed seed entry");
            }
            parsed
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8086);
        assert_eq!(config.default_ttl_secs, 600);
        assert_eq!(config.sweep_interval_secs, 30);
        assert_eq!(config.unknown_flight, UnknownFlightPolicy::ZeroCapacity);
        assert_eq!(config.seed, StaticCapacity::demo());
    }

    #[test]
    fn test_addr_formatting() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Config::default()
        };
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "9000"),
            ("APP_ENV", "Production"),
            ("INVENTORY_DEFAULT_TTL_SECS", "120"),
            ("INVENTORY_SWEEP_INTERVAL_SECS", "0"),
            ("INVENTORY_SEED", "QF1=300, ek5 = 12"),
            ("INVENTORY_UNKNOWN_FLIGHT", "default:40"),
        ]));

        assert_eq!(config.port, 9000);
        assert_eq!(config.environment, "Production");
        assert_eq!(config.default_ttl_secs, 120);
        assert_eq!(config.sweep_interval_secs, 0);
        assert_eq!(config.seed.get(&FlightId::new("QF1")), Some(300));
        assert_eq!(config.seed.get(&FlightId::new("EK5")), Some(12));
        assert_eq!(config.seed.len(), 2);
        assert_eq!(
            config.unknown_flight,
            UnknownFlightPolicy::DefaultCapacity(40)
        );
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "not-a-port"),
            ("INVENTORY_DEFAULT_TTL_SECS", "-5"),
            ("INVENTORY_UNKNOWN_FLIGHT", "sometimes"),
        ]));

        assert_eq!(config.port, 8086);
        assert_eq!(config.default_ttl_secs, 600);
        assert_eq!(config.unknown_flight, UnknownFlightPolicy::ZeroCapacity);
    }

    #[test]
    fn test_seed_skips_malformed_entries() {
        let seed = parse_seed("AI202=14,broken,6E310=-1,=5,UK811=8,");
        assert_eq!(seed.len(), 2);
        assert_eq!(seed.get(&FlightId::new("AI202")), Some(14));
        assert_eq!(seed.get(&FlightId::new("UK811")), Some(8));
    }
}
