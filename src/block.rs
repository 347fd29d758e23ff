use crate::error::ConvertError;
use serde_json::Value;
use std::fmt;

/// Block id in canonical text form, so `1` and `"1"` name the same block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        BlockId(id.into())
    }

    /// Numbers and strings are ids; anything else (including `null`) is not.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(BlockId(s.clone())),
            Value::Number(n) => {
                let text = if let Some(i) = n.as_i64() {
                    i.to_string()
                } else if let Some(u) = n.as_u64() {
                    u.to_string()
                } else {
                    format_number(n.as_f64()?)
                };
                Some(BlockId(text))
            }
            _ => None,
        }
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Start,
    SetTimbre,
    VoiceName,
    NewNote,
    Divide,
    Multiply,
    Pitch,
    Solfege,
    Number,
    Vspace,
    Hidden,
    Other,
}

impl BlockKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "start" => BlockKind::Start,
            "settimbre" => BlockKind::SetTimbre,
            "voicename" => BlockKind::VoiceName,
            "newnote" => BlockKind::NewNote,
            "divide" => BlockKind::Divide,
            "multiply" => BlockKind::Multiply,
            "pitch" => BlockKind::Pitch,
            "solfege" => BlockKind::Solfege,
            "number" => BlockKind::Number,
            "vspace" => BlockKind::Vspace,
            "hidden" => BlockKind::Hidden,
            _ => BlockKind::Other,
        }
    }

    /// Never rendered; children take the block's place.
    pub fn is_transparent(self) -> bool {
        matches!(self, BlockKind::Vspace | BlockKind::Hidden)
    }

    /// Never rendered, and neither are its children.
    pub fn is_suppressed(self) -> bool {
        self == BlockKind::Number
    }
}

/// Second element of a `[tag, payload]` type field.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Bare string type field.
    Absent,
    /// Missing second element decodes as `null`.
    Present(Value),
}

/// The `value` carried by literal blocks (`number`, `voicename`, `solfege`, ...).
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Text(String),
}

impl Literal {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Literal::Number(n) => Some(*n),
            Literal::Text(_) => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Literal::Number(n) => *n != 0.0 && !n.is_nan(),
            Literal::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(n) => f.write_str(&format_number(*n)),
            Literal::Text(s) => f.write_str(s),
        }
    }
}

/// Shortest decimal form as a script runtime prints it: positional between
/// `1e-6` and `1e21`, exponent form (`1e+21`, `1.5e-7`) outside, and
/// non-finite values spelled `Infinity`, `-Infinity` and `NaN`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n < 0.0 { "-" } else { "" };
        format!("{}Infinity", sign)
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        let text = format!("{:e}", n);
        match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => text,
        }
    } else {
        n.to_string()
    }
}

#[derive(Debug, Clone)]
pub struct Block {
    pub id: BlockId,
    pub position: usize,
    pub tag: String,
    pub kind: BlockKind,
    pub payload: Payload,
    pub value: Option<Literal>,
    pub clamps: Vec<Option<BlockId>>,
    pub next: Option<BlockId>,
}

impl Block {
    /// Decode one `[id, typeField, ...fields, connections]` tuple.
    pub fn decode(position: usize, raw: &Value) -> Result<Block, ConvertError> {
        let invalid = |reason: &str| ConvertError::InvalidBlock {
            position,
            reason: reason.to_string(),
        };

        let fields = raw.as_array().ok_or_else(|| invalid("expected a list"))?;
        if fields.len() < 2 {
            return Err(invalid("expected at least an id and a type"));
        }

        let id = BlockId::from_value(&fields[0])
            .ok_or_else(|| invalid("id must be a number or a string"))?;

        let (tag, payload) = match &fields[1] {
            Value::String(tag) => (tag.clone(), Payload::Absent),
            Value::Array(pair) => match pair.first() {
                Some(Value::String(tag)) => (
                    tag.clone(),
                    Payload::Present(pair.get(1).cloned().unwrap_or(Value::Null)),
                ),
                _ => return Err(invalid("type pair must start with a string tag")),
            },
            _ => return Err(invalid("type must be a string or a [tag, payload] pair")),
        };

        let value = match &payload {
            Payload::Present(Value::Object(obj)) => match obj.get("value") {
                Some(Value::Number(n)) => n.as_f64().map(Literal::Number),
                Some(Value::String(s)) => Some(Literal::Text(s.clone())),
                _ => None,
            },
            _ => None,
        };

        let mut clamps: Vec<Option<BlockId>> = match fields.last() {
            Some(Value::Array(conns)) if fields.len() > 2 => {
                conns.iter().map(BlockId::from_value).collect()
            }
            _ => Vec::new(),
        };
        let next = clamps.pop().flatten();

        Ok(Block {
            id,
            position,
            kind: BlockKind::from_tag(&tag),
            tag,
            payload,
            value,
            clamps,
            next,
        })
    }

    /// Every connection in order, clamps first, with empty slots dropped.
    pub fn connections(&self) -> impl Iterator<Item = &BlockId> {
        self.clamps.iter().flatten().chain(self.next.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(raw: Value) -> Block {
        Block::decode(0, &raw).unwrap()
    }

    fn ids(v: &[&str]) -> Vec<Option<BlockId>> {
        v.iter().map(|x| Some(BlockId::new(*x))).collect()
    }

    #[test]
    fn test_bare_tag() {
        let block = decode(json!([4, "newnote", 0, 0, [1, 5, null]]));
        assert_eq!(block.id.to_string(), "4");
        assert_eq!(block.tag, "newnote");
        assert_eq!(block.kind, BlockKind::NewNote);
        assert_eq!(block.payload, Payload::Absent);
        assert_eq!(block.value, None);
        assert_eq!(block.clamps, ids(&["1", "5"]));
        assert_eq!(block.next, None);
    }

    #[test]
    fn test_tag_pair_with_literal() {
        let block = decode(json!([7, ["number", {"value": 6}], 0, 0, [3]]));
        assert_eq!(block.kind, BlockKind::Number);
        assert_eq!(block.value, Some(Literal::Number(6.0)));
        assert!(block.clamps.is_empty());
        assert_eq!(block.next, Some(BlockId::new("3")));
    }

    #[test]
    fn test_text_literal() {
        let block = decode(json!([2, ["voicename", {"value": "guitar"}], 0, 0, [1]]));
        assert_eq!(block.value, Some(Literal::Text("guitar".to_string())));
    }

    #[test]
    fn test_pair_without_payload() {
        let block = decode(json!([0, ["start"], 0, 0, []]));
        assert_eq!(block.payload, Payload::Present(Value::Null));
        assert!(block.clamps.is_empty());
        assert_eq!(block.next, None);
    }

    #[test]
    fn test_string_ids_and_next() {
        let block = decode(json!(["a", "forward", ["b", null, "c"]]));
        assert_eq!(block.id.to_string(), "a");
        assert_eq!(block.clamps, vec![Some(BlockId::new("b")), None]);
        assert_eq!(block.next, Some(BlockId::new("c")));
        let all: Vec<String> = block.connections().map(|id| id.to_string()).collect();
        assert_eq!(all, vec!["b", "c"]);
    }

    #[test]
    fn test_no_connections_slot() {
        // The type pair is the last element here, not a connection list.
        let block = decode(json!([0, ["start", {"xcor": 1}]]));
        assert!(block.clamps.is_empty());
        assert_eq!(block.next, None);
    }

    #[test]
    fn test_numeric_id_forms_match() {
        assert_eq!(BlockId::from_value(&json!(1)), BlockId::from_value(&json!("1")));
        assert_eq!(BlockId::from_value(&json!(1.0)), Some(BlockId::new("1")));
        assert_eq!(BlockId::from_value(&json!(null)), None);
    }

    #[test]
    fn test_invalid_blocks() {
        assert!(matches!(
            Block::decode(3, &json!({"id": 1})),
            Err(ConvertError::InvalidBlock { position: 3, .. })
        ));
        assert!(Block::decode(0, &json!([1])).is_err());
        assert!(Block::decode(0, &json!([null, "start", []])).is_err());
        assert!(Block::decode(0, &json!([1, 42, []])).is_err());
        assert!(Block::decode(0, &json!([1, [{"value": 1}], []])).is_err());
    }

    #[test]
    fn test_kind_classes() {
        assert!(BlockKind::from_tag("vspace").is_transparent());
        assert!(BlockKind::from_tag("hidden").is_transparent());
        assert!(BlockKind::from_tag("number").is_suppressed());
        assert!(!BlockKind::from_tag("forward").is_transparent());
        assert_eq!(BlockKind::from_tag("forward"), BlockKind::Other);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(1.0 / 3.0), "0.3333333333333333");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn test_format_number_exponent_range() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-1.5e22), "-1.5e+22");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(2.5e-9), "2.5e-9");
        assert_eq!(format_number(0.000001), "0.000001");
    }

    #[test]
    fn test_literal_truthiness() {
        assert!(Literal::Text("sol".to_string()).is_truthy());
        assert!(!Literal::Text(String::new()).is_truthy());
        assert!(!Literal::Number(0.0).is_truthy());
        assert!(Literal::Number(-1.5).is_truthy());
        assert_eq!(Literal::Number(4.0).to_string(), "4");
    }
}
