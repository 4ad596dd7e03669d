use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub default_horizon_days: u32,
    pub max_horizon_days: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            default_horizon_days: env::var("DEFAULT_HORIZON_DAYS").unwrap_or_else(|_| "7".to_string()).parse().expect("DEFAULT_HORIZON_DAYS must be a positive number"),
            max_horizon_days: env::var("MAX_HORIZON_DAYS").unwrap_or_else(|_| "60".to_string()).parse().expect("MAX_HORIZON_DAYS must be a positive number"),
        }
    }

    /// The default horizon is served without further checks, so it must
    /// already lie within `1..=max_horizon_days`.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_horizon_days < 1 {
            return Err("MAX_HORIZON_DAYS must be at least 1".into());
        }
        if self.default_horizon_days < 1 || self.default_horizon_days > self.max_horizon_days {
            return Err(format!(
                "DEFAULT_HORIZON_DAYS must be between 1 and MAX_HORIZON_DAYS ({}), got {}",
                self.max_horizon_days, self.default_horizon_days
            ));
        }
        Ok(())
    }
}
