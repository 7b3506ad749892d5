//! Cleanup of the model's final text.
//!
//! Some hosted models leak their tool-call syntax into plain answers or wrap
//! JSON in a markdown fence. Neither should reach the HTTP caller.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref FUNCTION_BLOCK: Regex =
        Regex::new(r"(?s)<function[=\s>].*?</function>").unwrap();
    static ref TOOL_CALL_BLOCK: Regex = Regex::new(r"(?s)<tool_call>.*?</tool_call>").unwrap();
    static ref DANGLING_TAG: Regex =
        Regex::new(r"</?(?:function|tool_call)(?:=[^>]*)?>").unwrap();
    static ref JSON_FENCE: Regex =
        Regex::new(r"(?s)^```(?:json|JSON)?\s*\n?(.*?)\n?\s*```$").unwrap();
}

pub fn sanitize_final_answer(raw: &str) -> String {
    let text = FUNCTION_BLOCK.replace_all(raw, "");
    let text = TOOL_CALL_BLOCK.replace_all(&text, "");
    let text = DANGLING_TAG.replace_all(&text, "");
    let trimmed = text.trim();

    match JSON_FENCE.captures(trimmed).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str().trim().to_string(),
        None => trimmed.to_string(),
    }
}
