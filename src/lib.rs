pub mod block;
pub mod config;
pub mod error;
pub mod index;
pub mod metadata;
pub mod names;
pub mod walk;

use block::Block;
use config::Config;
use error::ConvertError;
use index::BlockIndex;
use serde_json::Value;
use std::fs;
use std::path::Path;
use walk::Walker;

/// Parse a project file's text and render it as a block tree.
pub fn convert(text: &str, config: &Config) -> Result<String, ConvertError> {
    let data: Value = serde_json::from_str(text)?;
    convert_value(&data, config)
}

pub fn convert_value(data: &Value, config: &Config) -> Result<String, ConvertError> {
    let raw = data.as_array().ok_or(ConvertError::NotAList)?;
    if raw.is_empty() {
        return Err(ConvertError::Empty);
    }
    log::info!("loaded {} blocks", raw.len());

    // The root is whatever sits first, even if a later block reuses its id.
    let root = Block::decode(0, &raw[0])?;

    let mut blocks: Vec<Block> = vec![root.clone()];
    for (position, b) in raw.iter().enumerate().skip(1) {
        match Block::decode(position, b) {
            Ok(block) => blocks.push(block),
            Err(e) => log::warn!("skipping {}", e),
        }
    }
    let index = BlockIndex::build(blocks);

    let root_meta = metadata::extract(&root.payload, &config.metadata_keys);
    log::info!("root block {} ({}): {}", root.id, root.tag, root_meta);

    let mut lines = vec![config.header.clone()];
    lines.extend(Walker::new(&index, config).walk(&root));
    Ok(lines.join("\n"))
}

/// Like [`convert`], but input that is not a project is reported and
/// yields `None` instead of an error.
pub fn render(text: &str, config: &Config) -> Result<Option<String>, ConvertError> {
    match convert(text, config) {
        Ok(report) => Ok(Some(report)),
        Err(e) if e.is_rejection() => {
            log::warn!("{}", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Write the report for `text` to `output`. Returns `false`, leaving
/// `output` untouched, when the input is rejected.
pub fn convert_to_file(text: &str, output: &Path, config: &Config) -> Result<bool, ConvertError> {
    let report = match render(text, config)? {
        Some(report) => report,
        None => return Ok(false),
    };
    fs::write(output, &report).map_err(|source| ConvertError::Io {
        path: output.to_path_buf(),
        source,
    })?;
    Ok(true)
}
