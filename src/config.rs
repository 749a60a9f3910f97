use std::env;

/// Indicator window configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorConfig {
    /// Simple moving average windows (short, medium, long, very long).
    pub ma_windows: Vec<usize>,
    /// EMA span; smoothing factor is 2 / (span + 1).
    pub ema_span: usize,
    pub rsi_window: usize,
    /// Window of the rolling close standard deviation.
    pub volatility_window: usize,
    /// Lookback windows for the price-structure flag.
    pub structure_windows: Vec<usize>,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ma_windows: vec![10, 20, 50, 200],
            ema_span: 10,
            rsi_window: 14,
            volatility_window: 14,
            structure_windows: vec![15, 30, 45, 60, 90],
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// SQLite database file.
    pub database_path: String,
    /// Yahoo Finance symbol of the instrument.
    pub price_symbol: String,
    /// Lookback range for daily bars.
    pub price_range: String,
    pub price_interval: String,
    /// NewsData.io API key; news is skipped when absent.
    pub newsdata_api_key: Option<String>,
    /// Search query sent to the news source.
    pub news_query: String,
    /// Timeout applied to every outbound request.
    pub http_timeout_secs: u64,
    pub indicators: IndicatorConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "market_data.db".to_string()),
            price_symbol: env::var("PRICE_SYMBOL").unwrap_or_else(|_| "GC=F".to_string()),
            price_range: env::var("PRICE_RANGE").unwrap_or_else(|_| "1y".to_string()),
            price_interval: env::var("PRICE_INTERVAL").unwrap_or_else(|_| "1d".to_string()),
            newsdata_api_key: env::var("NEWSDATA_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            news_query: env::var("NEWS_QUERY").unwrap_or_else(|_| {
                "gold price OR gold market OR gold investment OR gold bullion".to_string()
            }),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
            indicators: IndicatorConfig::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_config_defaults() {
        let config = IndicatorConfig::default();
        assert_eq!(config.ma_windows, vec![10, 20, 50, 200]);
        assert_eq!(config.ema_span, 10);
        assert_eq!(config.rsi_window, 14);
        assert_eq!(config.volatility_window, 14);
        assert_eq!(config.structure_windows, vec![15, 30, 45, 60, 90]);
    }

    #[test]
    fn test_config_from_env_has_sane_values() {
        let config = Config::from_env();
        assert!(!config.host.is_empty());
        assert!(!config.database_path.is_empty());
        assert!(!config.price_symbol.is_empty());
        assert!(config.http_timeout_secs > 0);
    }

    #[test]
    fn test_config_clone() {
        let config = Config::from_env();
        let cloned = config.clone();
        assert_eq!(config.host, cloned.host);
        assert_eq!(config.port, cloned.port);
        assert_eq!(config.indicators, cloned.indicators);
    }
}
