//! AI response normalization
//!
//! Completions are expected to be JSON but arrive wrapped in Markdown
//! fences, prose, or partial garbage. The normalizer strips fences, tries a
//! strict parse, falls back to the widest bracket-bounded substring, and
//! validates the result shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Title used when the root of a mind map arrives without one
pub const DEFAULT_ROOT_TITLE: &str = "Document Overview";
/// Title used for nested nodes that arrive without one
const DEFAULT_NODE_TITLE: &str = "Untitled";

const MIN_QUESTION_CHARS: usize = 10;
const MIN_ANSWER_CHARS: usize = 5;

/// A validated question/answer pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QaItem {
    pub question: String,
    pub answer: String,
}

/// A node of the mind-map tree; repaired recursively on normalization
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MindmapNode {
    pub title: String,
    pub children: Vec<MindmapNode>,
}

#[derive(Error, Debug)]
pub enum NormalizeError {
    /// No usable JSON could be recovered; carries the original completion
    /// for diagnostics.
    #[error("AI response doesn't contain valid JSON format")]
    Malformed { raw: String },
    /// JSON parsed but every item failed validation.
    #[error("no valid items in AI response")]
    NoValidItems,
}

/// Remove Markdown code-fence markers anywhere in the completion.
fn strip_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Strict parse, falling back to the widest `open`..`close` substring.
///
/// The fallback is a greedy bound (first opener to last closer), not a
/// balanced scan; it recovers JSON embedded in prose but can mis-bound when
/// unrelated brackets appear outside the payload.
fn parse_with_bounds(cleaned: &str, open: char, close: char) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(cleaned) {
        return Some(value);
    }
    let start = cleaned.find(open)?;
    let end = cleaned.rfind(close)?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&cleaned[start..=end]).ok()
}

/// Normalize a completion into validated Q&A items.
///
/// Items missing string fields or below the length floors are dropped,
/// not corrected.
pub fn normalize_qa(raw: &str) -> Result<Vec<QaItem>, NormalizeError> {
    let cleaned = strip_fences(raw);
    let malformed = || NormalizeError::Malformed {
        raw: raw.to_string(),
    };

    let value = parse_with_bounds(&cleaned, '[', ']').ok_or_else(malformed)?;
    let items = value.as_array().ok_or_else(malformed)?;

    let valid: Vec<QaItem> = items.iter().filter_map(validate_item).collect();
    if valid.is_empty() {
        return Err(NormalizeError::NoValidItems);
    }
    Ok(valid)
}

fn validate_item(item: &Value) -> Option<QaItem> {
    let question = item.get("question")?.as_str()?;
    let answer = item.get("answer")?.as_str()?;

    if question.trim().chars().count() > MIN_QUESTION_CHARS
        && answer.trim().chars().count() > MIN_ANSWER_CHARS
    {
        Some(QaItem {
            question: question.to_string(),
            answer: answer.to_string(),
        })
    } else {
        None
    }
}

/// Normalize a completion into a mind-map tree.
///
/// Missing or invalid `title`/`children` are repaired at every depth, so
/// consumers always see a well-formed tree.
pub fn normalize_mindmap(raw: &str) -> Result<MindmapNode, NormalizeError> {
    let cleaned = strip_fences(raw);
    let malformed = || NormalizeError::Malformed {
        raw: raw.to_string(),
    };

    let value = parse_with_bounds(&cleaned, '{', '}').ok_or_else(malformed)?;
    if !value.is_object() {
        return Err(malformed());
    }
    Ok(repair_node(&value, DEFAULT_ROOT_TITLE))
}

fn repair_node(value: &Value, default_title: &str) -> MindmapNode {
    let title = value
        .get("title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(default_title)
        .to_string();

    let children = value
        .get("children")
        .and_then(Value::as_array)
        .map(|kids| {
            kids.iter()
                .filter(|k| k.is_object())
                .map(|k| repair_node(k, DEFAULT_NODE_TITLE))
                .collect()
        })
        .unwrap_or_default();

    MindmapNode { title, children }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fenced_qa_array() {
        let raw = "```json\n[{\"question\":\"What is X and why?\",\"answer\":\"X is Y\"}]\n```";
        let items = normalize_qa(raw).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].question, "What is X and why?");
        assert_eq!(items[0].answer, "X is Y");
    }

    #[test]
    fn recovers_array_embedded_in_prose() {
        let raw = "Here are your flashcards:\n[{\"question\":\"What is the water cycle?\",\"answer\":\"Evaporation and rain\"}]\nHope this helps!";
        let items = normalize_qa(raw).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn drops_items_below_length_floors() {
        let raw = r#"[
            {"question":"What is the capital of France?","answer":"Paris is the capital"},
            {"question":"Why?","answer":"Because"},
            {"question":"What is the longest river?","answer":"Nile"}
        ]"#;
        let items = normalize_qa(raw).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].question, "What is the capital of France?");
    }

    #[test]
    fn drops_items_with_missing_or_non_string_fields() {
        let raw = r#"[
            {"question":"What is covered in chapter one?","answer":42},
            {"question":"What is covered in chapter two?","answer":"The second chapter topic"},
            "just a string"
        ]"#;
        let items = normalize_qa(raw).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].question, "What is covered in chapter two?");
    }

    #[test]
    fn garbage_text_is_malformed() {
        let err = normalize_qa("I could not generate questions, sorry.").unwrap_err();
        assert!(matches!(err, NormalizeError::Malformed { .. }));
    }

    #[test]
    fn malformed_error_carries_original_text() {
        let err = normalize_qa("no json here").unwrap_err();
        match err {
            NormalizeError::Malformed { raw } => assert_eq!(raw, "no json here"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_array_json_is_malformed() {
        // Parses as JSON after bracket extraction fails to find an array.
        let err = normalize_qa("{\"question\":\"abc\"}").unwrap_err();
        assert!(matches!(err, NormalizeError::Malformed { .. }));
    }

    #[test]
    fn all_items_invalid_means_no_valid_items() {
        let raw = r#"[{"question":"Hm?","answer":"No"}]"#;
        let err = normalize_qa(raw).unwrap_err();
        assert!(matches!(err, NormalizeError::NoValidItems));
    }

    #[test]
    fn mindmap_missing_root_title_gets_default() {
        let node = normalize_mindmap(r#"{"children":[{"title":"A"}]}"#).unwrap();
        assert_eq!(node.title, DEFAULT_ROOT_TITLE);
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].title, "A");
    }

    #[test]
    fn mindmap_repair_is_recursive() {
        let raw = r#"{"title":"Root","children":[
            {"title":"A","children":[{"children":[]}]},
            {"title":"B"}
        ]}"#;
        let node = normalize_mindmap(raw).unwrap();
        assert_eq!(node.children[0].children[0].title, "Untitled");
        assert!(node.children[1].children.is_empty());
    }

    #[test]
    fn mindmap_non_object_children_are_dropped() {
        let raw = r#"{"title":"Root","children":["stray", {"title":"Kept"}]}"#;
        let node = normalize_mindmap(raw).unwrap();
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].title, "Kept");
    }

    #[test]
    fn fenced_mindmap_parses() {
        let raw = "```json\n{\"title\":\"Topic\",\"children\":[]}\n```";
        let node = normalize_mindmap(raw).unwrap();
        assert_eq!(node.title, "Topic");
    }

    #[test]
    fn mindmap_garbage_is_malformed() {
        let err = normalize_mindmap("nothing structured here").unwrap_err();
        assert!(matches!(err, NormalizeError::Malformed { .. }));
    }
}
