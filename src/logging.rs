use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, HttpMakeClassifier, TraceLayer};
use tower_http::LatencyUnit;
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

type InitError = Box<dyn std::error::Error + Send + Sync>;

/// Appended to the filter unless `RUST_LOG` already says something about
/// `tower_http`, so every request still gets its span and response line.
const HTTP_TRACE_DIRECTIVE: &str = "tower_http=info";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub loki_enabled: bool,
    pub loki_url: Option<String>,
    pub service_name: String,
    pub environment: String,
    pub log_level: String,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            loki_enabled: std::env::var("LOKI_ENABLED")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            loki_url: std::env::var("LOKI_URL").ok().filter(|u| !u.trim().is_empty()),
            service_name: std::env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "insightboard".to_string()),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.loki_enabled && self.loki_url.is_none() {
            return Err("LOKI_ENABLED is true but LOKI_URL is not set".to_string());
        }
        if let Some(url) = &self.loki_url {
            url::Url::parse(url).map_err(|e| format!("LOKI_URL {:?} is not a URL: {}", url, e))?;
        }
        self.env_filter()
            .map_err(|e| format!("RUST_LOG {:?} is not a valid filter: {}", self.log_level, e))?;
        Ok(())
    }

    /// `log_level` plus the HTTP trace directive.
    pub fn env_filter(&self) -> Result<EnvFilter, tracing_subscriber::filter::ParseError> {
        if self.log_level.contains("tower_http") {
            EnvFilter::try_new(&self.log_level)
        } else if self.log_level.trim().is_empty() {
            EnvFilter::try_new(format!("info,{}", HTTP_TRACE_DIRECTIVE))
        } else {
            EnvFilter::try_new(format!("{},{}", self.log_level, HTTP_TRACE_DIRECTIVE))
        }
    }
}

/// Request spans and response lines for the router, at `info` so they show
/// up under the default filter. Latency is reported in milliseconds.
pub fn http_trace_layer() -> TraceLayer<HttpMakeClassifier> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}

pub fn init_logging(config: LoggingConfig) -> Result<(), InitError> {
    config.validate()?;

    #[cfg(feature = "loki")]
    if config.loki_enabled {
        if let Some(loki_url) = config.loki_url.clone() {
            return init_with_loki(config, &loki_url);
        }
    }

    tracing_subscriber::registry()
        .with(config.env_filter()?)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    tracing::info!(
        service = %config.service_name,
        environment = %config.environment,
        "console logging ready"
    );
    Ok(())
}

// Spawns the Loki shipping task, so this must run inside the tokio runtime.
#[cfg(feature = "loki")]
fn init_with_loki(config: LoggingConfig, loki_url: &str) -> Result<(), InitError> {
    let (loki_layer, task) = tracing_loki::builder()
        .label("service", &config.service_name)?
        .label("environment", &config.environment)?
        .build_url(url::Url::parse(loki_url)?)?;

    tokio::spawn(task);

    tracing_subscriber::registry()
        .with(config.env_filter()?)
        .with(tracing_subscriber::fmt::layer())
        .with(loki_layer)
        .try_init()?;

    tracing::info!(service = %config.service_name, "shipping logs to Loki at {}", loki_url);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(log_level: &str) -> LoggingConfig {
        LoggingConfig {
            loki_enabled: false,
            loki_url: None,
            service_name: "insightboard".into(),
            environment: "test".into(),
            log_level: log_level.into(),
        }
    }

    #[test]
    fn test_loki_requires_url() {
        let enabled = LoggingConfig { loki_enabled: true, ..config("info") };
        assert!(enabled.validate().is_err());

        let ok = LoggingConfig { loki_url: Some("http://localhost:3100".into()), ..enabled.clone() };
        assert!(ok.validate().is_ok());

        let bad = LoggingConfig { loki_url: Some("not a url".into()), ..enabled };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_filter_adds_http_trace_directive() {
        let filter = config("debug").env_filter().unwrap().to_string();
        assert!(filter.contains("debug"));
        assert!(filter.contains(HTTP_TRACE_DIRECTIVE));

        let blank = config("  ").env_filter().unwrap().to_string();
        assert!(blank.contains(HTTP_TRACE_DIRECTIVE));
    }

    #[test]
    fn test_filter_keeps_explicit_tower_http_level() {
        let filter = config("warn,tower_http=trace").env_filter().unwrap().to_string();
        assert!(filter.contains("tower_http=trace"));
        assert!(!filter.contains(HTTP_TRACE_DIRECTIVE));
    }

    #[test]
    fn test_invalid_filter_fails_validation() {
        let err = config("info,tower_http=loudest").validate().unwrap_err();
        assert!(err.starts_with("RUST_LOG"));
    }

    #[tokio::test]
    async fn test_trace_layer_passes_responses_through() {
        use axum::routing::get;
        use tower::ServiceExt;

        let app = axum::Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(http_trace_layer());
        let request = http::Request::builder().uri("/").body(axum::body::Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), http::StatusCode::OK);
    }
}
