use super::parsing::{
    env_optional, env_or_default, parse_bool, parse_cors_origins, parse_environment, parse_f64,
    parse_u16, parse_u64, parse_usize,
};
use super::secret::load_or_create_secret_key;
use super::types::{
    ApiSettings, ConfigError, CorsSettings, DatabaseSettings, GradingSettings, JudgeSettings,
    RedisSettings, RuntimeSettings, SecuritySettings, ServerHost, ServerPort, ServerSettings,
    Settings, TelemetrySettings,
};

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let host = env_or_default("GRADER_HOST", "0.0.0.0");
        let port = env_or_default("GRADER_PORT", "8000");

        let environment =
            parse_environment(env_optional("GRADER_ENV").or_else(|| env_optional("ENVIRONMENT")));
        let strict_config =
            env_optional("GRADER_STRICT_CONFIG").map(|value| parse_bool(&value)).unwrap_or(false)
                || environment.is_production();

        let project_name = env_or_default("PROJECT_NAME", "LMS Grader API");
        let version = env_or_default("VERSION", env!("CARGO_PKG_VERSION"));
        let api_v1_str = env_or_default("API_V1_STR", "/api/v1");

        let explicit_secret = env_optional("SECRET_KEY");
        if strict_config && explicit_secret.is_none() {
            return Err(ConfigError::MissingSecret("SECRET_KEY"));
        }
        let secret_key = explicit_secret.unwrap_or_else(load_or_create_secret_key);
        let algorithm = env_or_default("ALGORITHM", "HS256");

        let cors_origins = parse_cors_origins(env_optional("BACKEND_CORS_ORIGINS"))?;

        let postgres_server = env_or_default("POSTGRES_SERVER", "localhost");
        let postgres_port = parse_u16("POSTGRES_PORT", env_or_default("POSTGRES_PORT", "5432"))?;
        let postgres_user = env_or_default("POSTGRES_USER", "grader");
        let postgres_password = env_or_default("POSTGRES_PASSWORD", "");
        let postgres_db = env_or_default("POSTGRES_DB", "lms_grader");
        let database_url = env_optional("DATABASE_URL");

        let redis_host = env_or_default("REDIS_HOST", "localhost");
        let redis_port = parse_u16("REDIS_PORT", env_or_default("REDIS_PORT", "6379"))?;
        let redis_db = parse_u16("REDIS_DB", env_or_default("REDIS_DB", "0"))?;
        let redis_password = env_or_default("REDIS_PASSWORD", "");

        let judge_base_url_env = env_optional("JUDGE_BASE_URL");
        if strict_config && judge_base_url_env.is_none() {
            return Err(ConfigError::MissingSecret("JUDGE_BASE_URL"));
        }
        let judge_base_url =
            judge_base_url_env.unwrap_or_else(|| "http://localhost:2358".to_string());
        let judge_auth_token = env_optional("JUDGE_AUTH_TOKEN");
        let judge_poll_interval_ms = parse_u64(
            "JUDGE_POLL_INTERVAL_MS",
            env_or_default("JUDGE_POLL_INTERVAL_MS", "1000"),
        )?;
        let judge_timeout_ms =
            parse_u64("JUDGE_TIMEOUT_MS", env_or_default("JUDGE_TIMEOUT_MS", "12000"))?;
        let judge_request_timeout_seconds = parse_u64(
            "JUDGE_REQUEST_TIMEOUT_SECONDS",
            env_or_default("JUDGE_REQUEST_TIMEOUT_SECONDS", "30"),
        )?;

        let default_marks =
            parse_f64("GRADING_DEFAULT_MARKS", env_or_default("GRADING_DEFAULT_MARKS", "10"))?;
        let rate_limit_per_minute = parse_u64(
            "GRADING_RATE_LIMIT_PER_MINUTE",
            env_or_default("GRADING_RATE_LIMIT_PER_MINUTE", "30"),
        )?;
        let max_source_bytes = parse_usize(
            "GRADING_MAX_SOURCE_BYTES",
            env_or_default("GRADING_MAX_SOURCE_BYTES", "200000"),
        )?;

        let log_level = env_or_default("LOG_LEVEL", "info");
        let json = env_optional("LOG_JSON").map(|value| parse_bool(&value)).unwrap_or(false);
        let prometheus_enabled =
            env_optional("PROMETHEUS_ENABLED").map(|value| parse_bool(&value)).unwrap_or(false);

        let settings = Settings {
            server: ServerSettings { host: ServerHost::parse(host)?, port: ServerPort::parse(port)? },
            runtime: RuntimeSettings { environment, strict_config },
            api: ApiSettings { project_name, version, api_v1_str },
            security: SecuritySettings { secret_key, algorithm },
            cors: CorsSettings { origins: cors_origins },
            database: DatabaseSettings {
                postgres_server,
                postgres_port,
                postgres_user,
                postgres_password,
                postgres_db,
                database_url,
            },
            redis: RedisSettings {
                host: redis_host,
                port: redis_port,
                db: redis_db,
                password: redis_password,
            },
            judge: JudgeSettings {
                base_url: judge_base_url.trim_end_matches('/').to_string(),
                auth_token: judge_auth_token,
                poll_interval_ms: judge_poll_interval_ms,
                timeout_ms: judge_timeout_ms,
                request_timeout_seconds: judge_request_timeout_seconds,
            },
            grading: GradingSettings { default_marks, rate_limit_per_minute, max_source_bytes },
            telemetry: TelemetrySettings { log_level, json, prometheus_enabled },
        };

        settings.validate()?;
        Ok(settings)
    }

    pub(crate) fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host.0, self.server.port.0)
    }

    pub(crate) fn server_host(&self) -> &str {
        &self.server.host.0
    }

    pub(crate) fn server_port(&self) -> u16 {
        self.server.port.0
    }

    pub(crate) fn api(&self) -> &ApiSettings {
        &self.api
    }

    pub(crate) fn security(&self) -> &SecuritySettings {
        &self.security
    }

    pub(crate) fn cors(&self) -> &CorsSettings {
        &self.cors
    }

    pub(crate) fn database(&self) -> &DatabaseSettings {
        &self.database
    }

    pub(crate) fn redis(&self) -> &RedisSettings {
        &self.redis
    }

    pub(crate) fn judge(&self) -> &JudgeSettings {
        &self.judge
    }

    pub(crate) fn grading(&self) -> &GradingSettings {
        &self.grading
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    pub(crate) fn runtime(&self) -> &RuntimeSettings {
        &self.runtime
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.judge.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "JUDGE_POLL_INTERVAL_MS",
                value: "0".to_string(),
            });
        }

        if self.judge.timeout_ms < self.judge.poll_interval_ms {
            return Err(ConfigError::InvalidValue {
                field: "JUDGE_TIMEOUT_MS",
                value: self.judge.timeout_ms.to_string(),
            });
        }

        if self.grading.default_marks < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "GRADING_DEFAULT_MARKS",
                value: self.grading.default_marks.to_string(),
            });
        }

        if self.grading.max_source_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "GRADING_MAX_SOURCE_BYTES",
                value: "0".to_string(),
            });
        }

        if !self.judge.base_url.starts_with("http://") && !self.judge.base_url.starts_with("https://")
        {
            return Err(ConfigError::InvalidValue {
                field: "JUDGE_BASE_URL",
                value: self.judge.base_url.clone(),
            });
        }

        if !(self.runtime.strict_config || self.runtime.environment.is_production()) {
            return Ok(());
        }

        if self.database.database_url.is_none() && self.database.postgres_password.is_empty() {
            return Err(ConfigError::MissingSecret("POSTGRES_PASSWORD"));
        }
        Ok(())
    }
}
