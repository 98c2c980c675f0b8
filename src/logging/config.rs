use crate::config::Environment;

/// Subscriber settings derived from the environment.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub environment: Environment,
    /// Level applied to this crate when `RUST_LOG` is unset.
    pub level: String,
    /// Directory for the rolling `app.log` / `error.log` files.
    pub dir: String,
}

impl LogConfig {
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| {
            if environment.is_production() {
                "info".to_string()
            } else {
                "debug".to_string()
            }
        });
        let dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());

        Self {
            environment,
            level,
            dir,
        }
    }

    /// Directive used when `RUST_LOG` does not override it.
    pub fn default_directive(&self) -> String {
        format!(
            "trivia_backend={},tower_http=debug,axum=debug,sqlx=warn",
            self.level
        )
    }
}
