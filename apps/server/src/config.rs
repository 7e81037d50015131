/// Server configuration, read once at startup from the environment
/// (after dotenvy has loaded a `.env` file when present).
pub struct Config {
    pub listen_addr: String,
    pub db_path: String,
    pub data_dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        let data_dir = std::env::var("IG_DATA_DIR").unwrap_or_else(|_| "data".to_string());
        let db_path = std::env::var("IG_DB_PATH")
            .unwrap_or_else(|_| format!("{data_dir}/invest_guide.db"));
        Config {
            listen_addr: std::env::var("IG_LISTEN_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
            db_path,
            data_dir,
        }
    }
}
