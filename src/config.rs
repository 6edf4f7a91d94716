//! Layered settings: built-in defaults, then `fabric_attrs.toml` in the
//! working directory, then `FABRIC_*` environment variables.

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;
use crate::extract::AddOnProfile;

pub const CONFIG_FILE: &str = "fabric_attrs";

pub const DEFAULT_DESCRIPTION_HEADERS: [&str; 2] = ["ITEM DESC", "PRODUCT DESCRIPTION(EN)"];

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub profile: AddOnProfile,
    /// Header names that identify the description column, matched case-insensitively.
    pub description_headers: Vec<String>,
    /// Rows per parallel batch.
    pub chunk_size: usize,
    /// Default output workbook.
    pub output: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            profile: AddOnProfile::Full,
            description_headers: DEFAULT_DESCRIPTION_HEADERS.iter().map(|h| h.to_string()).collect(),
            chunk_size: 500,
            output: "output.xlsx".to_string(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_sources(Environment::with_prefix("FABRIC"))
    }

    fn from_sources(env: Environment) -> Result<Self> {
        let defaults = Settings::default();
        let settings = Config::builder()
            .set_default("profile", "full")?
            .set_default("description_headers", defaults.description_headers)?
            .set_default("chunk_size", defaults.chunk_size as u64)?
            .set_default("output", defaults.output)?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                env.try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("description_headers"),
            )
            .build()?;
        let mut settings: Settings = settings.try_deserialize()?;
        if settings.chunk_size == 0 {
            settings.chunk_size = 1;
        }
        Ok(settings)
    }
}
