use std::env;

/// Exclusive price bounds applied to every service listing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: 10.0,
            max: 400.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub access_token_secret: String,
    pub price_range: PriceRange,
    pub services_seed: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = PriceRange::default();
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "car_doctor.db".to_string()),
            access_token_secret: env::var("ACCESS_TOKEN_SECRET").unwrap_or_default(),
            price_range: PriceRange {
                min: env::var("PRICE_MIN")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.min),
                max: env::var("PRICE_MAX")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.max),
            },
            services_seed: env::var("SERVICES_SEED").ok().filter(|v| !v.is_empty()),
        }
    }
}
