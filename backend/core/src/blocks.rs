//! Block Kit builders for the few messages the bot composes itself.

use serde_json::{json, Value};

/// A `section` block with markdown text.
pub fn section_block(text: &str) -> Value {
    json!({
        "type": "section",
        "text": { "type": "mrkdwn", "text": text }
    })
}

/// `{"blocks": [...]}` from a list of blocks.
pub fn blocks_payload(blocks: Vec<Value>) -> Value {
    json!({ "blocks": blocks })
}

/// A message consisting of one markdown section.
pub fn simple_payload(text: &str) -> Value {
    blocks_payload(vec![section_block(text)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_block_escapes_quotes() {
        let block = section_block(r#"say "hi""#);
        let encoded = serde_json::to_string(&block).unwrap();
        assert!(encoded.contains(r#"say \"hi\""#));
    }

    #[test]
    fn test_empty_blocks_payload() {
        assert_eq!(blocks_payload(vec![]), json!({ "blocks": [] }));
    }
}
