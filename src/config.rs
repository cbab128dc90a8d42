use envconfig::Envconfig;

/// Environment-backed configuration. `GENAI_API_KEY` is only needed when a
/// real text-generation client is wired behind the `TextGenerator` seam.
#[derive(Envconfig, Debug)]
pub struct Config {
    #[envconfig(from = "GENAI_API_KEY")]
    pub genai_api_key: Option<String>,
    #[envconfig(from = "GENAI_MODEL", default = "gemini-3-flash-preview")]
    pub genai_model: String,
    #[envconfig(from = "VIT_DATA_DIR", default = ".vit-clubs-hub")]
    pub data_dir: String,
}

impl Config {
    pub fn load() -> Result<Config, envconfig::Error> {
        dotenv::dotenv().ok();
        Config::init_from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_env() {
        let config = Config::load().expect("config should load from defaults");
        assert_eq!(config.genai_model, "gemini-3-flash-preview");
        assert!(!config.data_dir.is_empty());
    }
}
