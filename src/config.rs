use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    pub seed_file: String,

    /// Grace period before a check-in after shift start counts as late
    pub late_tolerance_minutes: i64,
    /// Worked time past the scheduled shift length before overtime is flagged
    pub overtime_tolerance_minutes: i64,

    /// Broadcast buffer for the change feed
    pub notifier_capacity: usize,

    // Rate limiting
    pub rate_submit_per_min: u32,
    pub rate_query_per_min: u32,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            seed_file: env::var("SEED_FILE").unwrap_or_else(|_| "seed/directory.json".to_string()),

            late_tolerance_minutes: env::var("LATE_TOLERANCE_MIN")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .unwrap(),
            overtime_tolerance_minutes: env::var("OVERTIME_TOLERANCE_MIN")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .unwrap(),

            notifier_capacity: env::var("NOTIFIER_CAPACITY")
                .unwrap_or_else(|_| "256".to_string())
                .parse()
                .unwrap(),

            rate_submit_per_min: env::var("RATE_SUBMIT_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap(),
            rate_query_per_min: env::var("RATE_QUERY_PER_MIN")
                .unwrap_or_else(|_| "600".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),
        }
    }
}
