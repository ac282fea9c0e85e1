//! Application configuration loaded from environment variables.

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `PRODUCTS_TABLE` / `ORDERS_TABLE` / `EVENTS_TABLE` — entity store
///   table names (defaults: `"products"` / `"orders"` / `"events"`)
/// - `EVENT_TTL_SECS` — event log retention window (default: `300`)
/// - `AUDIT_BUS_NAME` — audit fallback bus name (default: `"order-audit"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub products_table: String,
    pub orders_table: String,
    pub events_table: String,
    pub event_ttl_secs: u64,
    pub audit_bus_name: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            products_table: std::env::var("PRODUCTS_TABLE").unwrap_or(defaults.products_table),
            orders_table: std::env::var("ORDERS_TABLE").unwrap_or(defaults.orders_table),
            events_table: std::env::var("EVENTS_TABLE").unwrap_or(defaults.events_table),
            event_ttl_secs: std::env::var("EVENT_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.event_ttl_secs),
            audit_bus_name: std::env::var("AUDIT_BUS_NAME").unwrap_or(defaults.audit_bus_name),
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
            port: 3000,
            log_level: "info".to_string(),
            products_table: "products".to_string(),
            orders_table: "orders".to_string(),
            events_table: "events".to_string(),
            event_ttl_secs: 300,
            audit_bus_name: "order-audit".to_string(),
        }
    }
}
