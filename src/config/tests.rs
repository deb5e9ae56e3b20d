#[cfg(test)]
mod config_tests {
    use crate::config::{
        default_api_base_url, default_cart_key, default_host, default_log_level, default_port,
        default_service_name, default_timeout, ApiConfig, Config, ConfigError, ServerConfig,
    };
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_vars(HashMap::new()).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3333);
        assert_eq!(config.server.request_timeout_seconds, 30);
        assert_eq!(config.api.api_base_url, "http://localhost:3333");
        assert_eq!(config.api.api_timeout_seconds, 10);
        assert_eq!(config.storage.storage_dir, PathBuf::from("./data"));
        assert_eq!(config.storage.cart_key, "cart");
        assert_eq!(config.observability.service_name, "rocketshoes-cart");
        assert_eq!(config.observability.log_level, "info");
        assert!(!config.observability.enable_json_logging);
    }

    #[test]
    fn test_config_from_vars() {
        let config = Config::from_vars(vars(&[
            ("ROCKETSHOES_PORT", "8080"),
            ("ROCKETSHOES_API_BASE_URL", "http://api.test:4000"),
            ("ROCKETSHOES_API_TIMEOUT_SECONDS", "3"),
            ("ROCKETSHOES_STORAGE_DIR", "/tmp/carts"),
            ("ROCKETSHOES_CART_KEY", "@RocketShoes:cart"),
            ("ROCKETSHOES_LOG_LEVEL", "debug"),
            ("ROCKETSHOES_ENABLE_JSON_LOGGING", "true"),
        ]))
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.api.api_base_url, "http://api.test:4000");
        assert_eq!(config.api.timeout(), Duration::from_secs(3));
        assert_eq!(config.storage.storage_dir, PathBuf::from("/tmp/carts"));
        assert_eq!(config.storage.cart_key, "@RocketShoes:cart");
        assert_eq!(config.observability.log_level, "debug");
        assert!(config.observability.enable_json_logging);
    }

    #[test]
    fn test_config_validation_rejects_bad_values() {
        for (key, value) in [
            ("ROCKETSHOES_PORT", "0"),
            ("ROCKETSHOES_REQUEST_TIMEOUT_SECONDS", "0"),
            ("ROCKETSHOES_API_TIMEOUT_SECONDS", "0"),
            ("ROCKETSHOES_API_BASE_URL", " "),
        ] {
            let result = Config::from_vars(vars(&[(key, value)]));
            assert!(
                matches!(result, Err(ConfigError::ValidationError { .. })),
                "{}={} should be rejected",
                key,
                value
            );
        }
    }

    #[test]
    fn test_config_rejects_unparseable_port() {
        let result = Config::from_vars(vars(&[("ROCKETSHOES_PORT", "not-a-port")]));
        assert!(matches!(result, Err(ConfigError::LoadError { .. })));
    }

    #[test]
    fn test_server_config_helpers() {
        let config = ServerConfig {
            host: "localhost".to_string(),
            port: 3333,
            request_timeout_seconds: 45,
        };

        assert_eq!(config.request_timeout(), Duration::from_secs(45));
        assert_eq!(config.bind_address(), "localhost:3333");

        let api = ApiConfig {
            api_base_url: default_api_base_url(),
            api_timeout_seconds: 7,
        };
        assert_eq!(api.timeout(), Duration::from_secs(7));
    }

    #[test]
    fn test_config_error_display() {
        let error = ConfigError::ValidationError {
            message: "Invalid configuration".to_string(),
        };
        assert_eq!(error.to_string(), "Validation error: Invalid configuration");
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_host(), "0.0.0.0");
        assert_eq!(default_port(), 3333);
        assert_eq!(default_timeout(), 30);
        assert_eq!(default_cart_key(), "cart");
        assert_eq!(default_service_name(), "rocketshoes-cart");
        assert_eq!(default_log_level(), "info");
    }
}
