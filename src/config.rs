use serde::Deserialize;

/// What to render for a `settimbre` block with no usable `voicename` child.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum MissingInstrument {
    #[default]
    Fallback,
    Omit,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_header")]
    pub header: String,

    #[serde(default = "default_metadata_keys")]
    pub metadata_keys: Vec<String>,

    #[serde(default)]
    pub missing_instrument: MissingInstrument,
}

fn default_header() -> String {
    "Start of Project".to_string()
}
fn default_metadata_keys() -> Vec<String> {
    ["id", "xcor", "ycor", "heading", "color", "shade", "pensize", "grey"]
        .iter()
        .map(|k| k.to_string())
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            header: default_header(),
            metadata_keys: default_metadata_keys(),
            missing_instrument: MissingInstrument::Fallback,
        }
    }
}
