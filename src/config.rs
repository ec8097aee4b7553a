use std::env;

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub data_file: String,
    pub assets_dir: String,
    pub public_base_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .expect("PORT must be a valid number");

        Self {
            port,
            data_file: env::var("POKEDEX_DATA_FILE")
                .unwrap_or_else(|_| "./data/pokedex.json".to_string()),
            assets_dir: env::var("POKEDEX_ASSETS_DIR").unwrap_or_else(|_| "./assets".to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}", port)),
        }
    }
}
