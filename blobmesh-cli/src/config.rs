//! CLI configuration
//!
//! The only knob the client needs is where to find the metadata service.

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub metadata_addr: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            metadata_addr: "http://127.0.0.1:5050".to_string(),
        }
    }
}

impl CliConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(addr) = std::env::var("METADATA_SERVER") {
            config.metadata_addr = addr;
        }
        config
    }
}
