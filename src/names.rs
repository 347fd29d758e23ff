use crate::block::{format_number, Block, BlockKind};
use crate::index::BlockIndex;

/// Display name for a block. `None` means the block has no name of its own:
/// a `settimbre` without a usable `voicename` child.
pub fn display_name(block: &Block, index: &BlockIndex) -> Option<String> {
    let name = match block.kind {
        BlockKind::SetTimbre => {
            return instrument(block, index).map(|name| format!("Set Instrument → {}", name));
        }
        BlockKind::NewNote => "Note".to_string(),
        BlockKind::Divide => match numeric_children(block, index).as_slice() {
            [a, b] => format!(
                "Divider Block → {} / {} = {}",
                format_number(*a),
                format_number(*b),
                format_number(a / b)
            ),
            _ => "Divider Block".to_string(),
        },
        BlockKind::Multiply => {
            let factors = numeric_children(block, index);
            if factors.is_empty() {
                "Multiply".to_string()
            } else {
                let factors: Vec<String> = factors.into_iter().map(format_number).collect();
                format!("Multiply → {}", factors.join(" * "))
            }
        }
        BlockKind::Pitch => "Pitch Calculation".to_string(),
        BlockKind::Solfege => match block.value.as_ref().filter(|v| v.is_truthy()) {
            Some(value) => format!("Solfege: {}", value),
            None => "Solfege".to_string(),
        },
        _ => capitalize(&block.tag),
    };
    Some(name)
}

/// Value of the first `voicename` clamp child, if it has a non-empty one.
fn instrument(block: &Block, index: &BlockIndex) -> Option<String> {
    let voice = block
        .clamps
        .iter()
        .filter_map(|id| index.resolve(id.as_ref()))
        .find(|child| child.kind == BlockKind::VoiceName)?;
    voice
        .value
        .as_ref()
        .filter(|v| v.is_truthy())
        .map(|v| v.to_string())
}

/// Numeric literal values of every resolvable connection, in connection order.
fn numeric_children(block: &Block, index: &BlockIndex) -> Vec<f64> {
    block
        .connections()
        .filter_map(|id| index.get(id))
        .filter_map(|child| child.value.as_ref().and_then(|v| v.as_number()))
        .collect()
}

fn capitalize(tag: &str) -> String {
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
