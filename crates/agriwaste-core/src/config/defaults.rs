//! Default value functions used by serde for config deserialization.

pub fn default_name() -> String {
    "agriwaste".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_true() -> bool {
    true
}

pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_port() -> u16 {
    8080
}

pub fn default_max_connections() -> u32 {
    4
}

pub fn default_connect_timeout_secs() -> u64 {
    10
}

pub fn default_query_timeout_secs() -> u64 {
    5
}

pub fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "https://smart-agriwaste.vercel.app".to_string(),
    ]
}

pub fn default_cors_max_age_secs() -> u64 {
    12 * 60 * 60
}
