use std::env;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_SERVICE_NAME: &str = "available-schedules";
pub const DEFAULT_ERROR_RATE: f64 = 0.01;
pub const DEFAULT_ROUTE_PREFIX: &str = "/v2";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub service_name: String,
    /// Probability in `[0, 1]` that an instrumented request fails on purpose.
    pub error_rate: f64,
    /// Added to every instrumented request before anything else runs.
    pub extra_latency: Duration,
    /// Ingress prefix, e.g. `/v2`. Empty means only the unprefixed routes exist.
    pub route_prefix: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            error_rate: DEFAULT_ERROR_RATE,
            extra_latency: Duration::ZERO,
            route_prefix: DEFAULT_ROUTE_PREFIX.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Invalid values never
    /// fail: they are logged and replaced by defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let service_name = read("SERVICE_NAME").unwrap_or_else(|| {
            warn!("SERVICE_NAME not set, using default");
            DEFAULT_SERVICE_NAME.to_string()
        });

        let mut error_rate = parse_non_negative(read("ERROR_RATE"), "ERROR_RATE", DEFAULT_ERROR_RATE);
        if error_rate > 1.0 {
            warn!("ERROR_RATE {} above 1, clamping", error_rate);
            error_rate = 1.0;
        }

        let extra_latency_ms = parse_non_negative(read("EXTRA_LATENCY_MS"), "EXTRA_LATENCY_MS", 0_i64);

        // An explicitly empty prefix disables the prefixed routes.
        let route_prefix = lookup("ROUTE_PREFIX")
            .map(|prefix| normalize_prefix(&prefix))
            .unwrap_or_else(|| DEFAULT_ROUTE_PREFIX.to_string());

        let port = match read("PORT") {
            Some(raw) => raw.parse::<u16>().unwrap_or_else(|_| {
                warn!("PORT value {:?} is invalid, using default", raw);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        Self {
            service_name,
            error_rate,
            extra_latency: Duration::from_millis(extra_latency_ms as u64),
            route_prefix,
            port,
        }
    }

    /// Joins the route prefix with `path`.
    pub fn prefixed(&self, path: &str) -> String {
        format!("{}{}", self.route_prefix, path)
    }

    pub fn has_prefix(&self) -> bool {
        !self.route_prefix.is_empty()
    }
}

#[derive(Debug, PartialEq)]
enum Rejected {
    Negative,
    Invalid,
}

/// Values that do not compare against zero, such as `NaN`, count as invalid.
fn check_non_negative<T>(raw: &str) -> Result<T, Rejected>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match raw.parse::<T>() {
        Ok(value) if value >= T::default() => Ok(value),
        Ok(value) if value < T::default() => Err(Rejected::Negative),
        _ => Err(Rejected::Invalid),
    }
}

fn parse_non_negative<T>(raw: Option<String>, key: &str, fallback: T) -> T
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let Some(raw) = raw else {
        return fallback;
    };
    match check_non_negative(&raw) {
        Ok(value) => value,
        Err(Rejected::Negative) => {
            warn!("{} value {:?} is negative, using default", key, raw);
            fallback
        }
        Err(Rejected::Invalid) => {
            warn!("{} value {:?} is invalid, using default", key, raw);
            fallback
        }
    }
}

fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = config_from(&[]);
        assert_eq!(config.service_name, "available-schedules");
        assert_eq!(config.error_rate, 0.01);
        assert_eq!(config.extra_latency, Duration::ZERO);
        assert_eq!(config.route_prefix, "/v2");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_error_rate_fallbacks() {
        assert_eq!(config_from(&[("ERROR_RATE", "abc")]).error_rate, 0.01);
        assert_eq!(config_from(&[("ERROR_RATE", "-0.5")]).error_rate, 0.01);
        assert_eq!(config_from(&[("ERROR_RATE", "3")]).error_rate, 1.0);
        assert_eq!(config_from(&[("ERROR_RATE", " 0.25 ")]).error_rate, 0.25);
    }

    #[test]
    fn test_non_numeric_floats_are_invalid_not_negative() {
        assert_eq!(check_non_negative::<f64>("NaN"), Err(Rejected::Invalid));
        assert_eq!(check_non_negative::<f64>("abc"), Err(Rejected::Invalid));
        assert_eq!(check_non_negative::<f64>("-0.2"), Err(Rejected::Negative));
        assert_eq!(check_non_negative::<f64>("0.2"), Ok(0.2));
        assert_eq!(config_from(&[("ERROR_RATE", "NaN")]).error_rate, 0.01);
    }

    #[test]
    fn test_extra_latency_parsing() {
        assert_eq!(
            config_from(&[("EXTRA_LATENCY_MS", "150")]).extra_latency,
            Duration::from_millis(150)
        );
        assert_eq!(config_from(&[("EXTRA_LATENCY_MS", "-10")]).extra_latency, Duration::ZERO);
        assert_eq!(config_from(&[("EXTRA_LATENCY_MS", "1.5")]).extra_latency, Duration::ZERO);
    }

    #[test]
    fn test_route_prefix_normalization() {
        assert_eq!(config_from(&[("ROUTE_PREFIX", "go/")]).route_prefix, "/go");
        assert_eq!(config_from(&[("ROUTE_PREFIX", "/")]).route_prefix, "");
        assert!(!config_from(&[("ROUTE_PREFIX", "/")]).has_prefix());
        assert!(!config_from(&[("ROUTE_PREFIX", "")]).has_prefix());
        assert_eq!(config_from(&[]).prefixed("/healthz"), "/v2/healthz");
    }

    #[test]
    fn test_blank_service_name_uses_default() {
        let config = config_from(&[("SERVICE_NAME", "   "), ("PORT", "nope")]);
        assert_eq!(config.service_name, "available-schedules");
        assert_eq!(config.port, 8080);
    }
}
