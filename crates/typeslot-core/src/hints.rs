//! Type hint matching.
//!
//! Given a document, a cursor and the character that was just typed, decide
//! which slot is being annotated (a parameter, a return type or a variable)
//! and look up ranked candidates for it in the file's [`InferData`].
//!
//! Positions follow editor conventions: `line` and `character` are 0-based,
//! while inference data uses 1-based lines. [`Cursor::new`] takes the column
//! in chars; [`Cursor::from_utf16`] takes the UTF-16 offset editors send.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::infer::InferData;

/// Typed after a parameter or variable name.
pub const PARAM_HINT_TRIGGER: char = ':';

/// Typed as the second character of `->`.
pub const RETURN_HINT_TRIGGER: char = '>';

/// Characters that cannot appear in a parameter name being annotated.
static NON_PARAM_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[!:?/\\{}.+=)'";@&£%¤|<>$^~¨ -]"#).expect("valid pattern"));

/// `def ` or `async def ` at the start of the text.
static DEF_LINE_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*(def |async *def )").expect("valid pattern"));

/// A `def` keyword at the start of any line.
static DEF_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(async *)?def").expect("valid pattern"));

/// A signature closer after at least one character: `):` or `-> T:`.
static SIGNATURE_CLOSED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s\S]+(\):|-> *[^:\s]+:)").expect("valid pattern"));

/// `->` right after a closing parenthesis, at the end of the line.
static RETURN_ARROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\) *->[: ]*$").expect("valid pattern"));

/// An annotation colon followed by `=`.
static ANNOTATED_ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*:\s*=").expect("valid pattern"));

/// How many lines above the cursor are searched for an open `def`.
const SIGNATURE_LOOKBACK: usize = 4;

/// The kind of position being annotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeSlot {
    Parameter,
    ReturnType,
    Variable,
}

impl fmt::Display for TypeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TypeSlot::Parameter => "Parameter",
            TypeSlot::ReturnType => "ReturnType",
            TypeSlot::Variable => "Variable",
        };
        f.write_str(s)
    }
}

/// A ranked completion candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintCandidate {
    /// Type annotation to insert.
    pub annotation: String,
    /// 1-based rank, 1 being the most confident.
    pub rank: usize,
    pub slot: TypeSlot,
    /// Parameter, variable or function name the annotation belongs to.
    pub identifier: String,
    /// 1-based line of the slot.
    pub line: u32,
    /// Sort key preserving rank order.
    pub sort_text: String,
}

/// A cursor position inside a document.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    pub text: &'a str,
    pub line: usize,
    pub character: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(text: &'a str, line: usize, character: usize) -> Self {
        Self {
            text,
            line,
            character,
        }
    }

    /// Cursor whose column is given in UTF-16 code units.
    ///
    /// An offset inside a surrogate pair rounds up to the end of that char.
    pub fn from_utf16(text: &'a str, line: usize, utf16_character: usize) -> Self {
        let line_text = text.lines().nth(line).unwrap_or("");
        let mut units = 0;
        let mut character = 0;
        for c in line_text.chars() {
            if units >= utf16_character {
                break;
            }
            units += c.len_utf16();
            character += 1;
        }
        Self::new(text, line, character)
    }

    /// Text of the cursor line, empty when the line is past the end.
    pub fn line_text(&self) -> &'a str {
        self.text.lines().nth(self.line).unwrap_or("")
    }

    /// 1-based line number used by inference data.
    fn data_line(&self) -> u32 {
        u32::try_from(self.line + 1).unwrap_or(u32::MAX)
    }

    /// Cursor line up to the character before the cursor (the trigger).
    fn before_trigger(&self) -> String {
        self.line_text()
            .chars()
            .take(self.character.saturating_sub(1))
            .collect()
    }

    /// Up to [`SIGNATURE_LOOKBACK`] previous lines followed by the cursor
    /// line up to the cursor.
    fn window(&self) -> String {
        let lookback = self.line.min(SIGNATURE_LOOKBACK);
        let mut window = String::new();
        for previous in self
            .text
            .lines()
            .skip(self.line - lookback)
            .take(lookback)
        {
            window.push_str(previous);
            window.push('\n');
        }
        window.extend(self.line_text().chars().take(self.character));
        window
    }
}

/// Candidates for every slot the trigger applies to: parameters and
/// variables for `:`, return types for `>`.
pub fn complete(data: &InferData, cursor: &Cursor<'_>, trigger: char) -> Vec<HintCandidate> {
    match trigger {
        PARAM_HINT_TRIGGER => {
            let mut items = parameter_hints(data, cursor);
            items.extend(variable_hints(data, cursor));
            items
        }
        RETURN_HINT_TRIGGER => return_hints(data, cursor),
        _ => Vec::new(),
    }
}

/// Candidates for the parameter whose `:` was just typed.
pub fn parameter_hints(data: &InferData, cursor: &Cursor<'_>) -> Vec<HintCandidate> {
    if cursor.character == 0 {
        return Vec::new();
    }

    let preceding = cursor.before_trigger();
    let preceding = preceding.trim();
    if !should_provide_param_hints(preceding, &cursor.window()) {
        return Vec::new();
    }

    let Some(param) = param_hint_target(preceding) else {
        return Vec::new();
    };

    let line = cursor.data_line();
    data.function_at(line)
        .and_then(|f| f.params.get(param))
        .map(|annotations| to_candidates(annotations, TypeSlot::Parameter, param, line))
        .unwrap_or_default()
}

/// Candidates for the return type whose `->` was just typed.
pub fn return_hints(data: &InferData, cursor: &Cursor<'_>) -> Vec<HintCandidate> {
    let line_text = cursor.line_text();
    if !should_provide_return_hints(line_text, cursor.character) {
        return Vec::new();
    }

    let line = cursor.data_line();
    data.function_at(line)
        .map(|f| to_candidates(&f.return_types, TypeSlot::ReturnType, &f.name, line))
        .unwrap_or_default()
}

/// Candidates for the variable whose `:` was just typed before an `=`.
pub fn variable_hints(data: &InferData, cursor: &Cursor<'_>) -> Vec<HintCandidate> {
    if cursor.character == 0 {
        return Vec::new();
    }

    let line_text = cursor.line_text();
    let remainder: String = line_text
        .chars()
        .skip(cursor.character - 1)
        .collect();
    if !should_provide_variable_hints(&remainder) {
        return Vec::new();
    }

    let name = variable_hint_target(line_text);
    let line = cursor.data_line();
    data.variable_at(line, &name)
        .map(|v| to_candidates(&v.annotations, TypeSlot::Variable, &v.name, line))
        .unwrap_or_default()
}

fn to_candidates(
    annotations: &[String],
    slot: TypeSlot,
    identifier: &str,
    line: u32,
) -> Vec<HintCandidate> {
    annotations
        .iter()
        .enumerate()
        .map(|(id, annotation)| HintCandidate {
            annotation: annotation.clone(),
            rank: id + 1,
            slot,
            identifier: identifier.to_string(),
            line,
            sort_text: id.to_string(),
        })
        .collect()
}

// =============================================================================
// Slot detection
// =============================================================================

/// The parameter about to be annotated, given the trimmed text before `:`.
///
/// `def f(self, x` yields `x`; anything that cannot be a bare name yields
/// `None`.
pub fn param_hint_target(preceding: &str) -> Option<&str> {
    let pieces: Vec<&str> = preceding.split([',', '(', '*']).collect();
    let param = if pieces.len() > 1 {
        pieces[pieces.len() - 1].trim()
    } else {
        preceding
    };

    if param.is_empty() || NON_PARAM_CHAR.is_match(param) {
        return None;
    }
    Some(param)
}

/// Whether a `:` typed after `preceding` sits inside a function signature.
///
/// Either the current line opens a `def`, or a `def` within `window` has not
/// been closed by `):` or `-> T:` yet.
pub fn should_provide_param_hints(preceding: &str, window: &str) -> bool {
    if preceding.contains('#') {
        return false;
    }
    if DEF_LINE_START.is_match(preceding) {
        return true;
    }

    DEF_KEYWORD
        .find_iter(window)
        .any(|keyword| !SIGNATURE_CLOSED.is_match(&window[keyword.end()..]))
}

/// Whether the two characters before `character` are `->` closing a
/// parameter list.
pub fn should_provide_return_hints(line_text: &str, character: usize) -> bool {
    if character < 2 {
        return false;
    }
    let arrow: String = line_text.chars().skip(character - 2).take(2).collect();
    arrow == "->" && RETURN_ARROW.is_match(line_text)
}

/// Whether the text from the trigger onward reads `: =`, optionally spaced.
pub fn should_provide_variable_hints(remainder: &str) -> bool {
    ANNOTATED_ASSIGNMENT.is_match(remainder)
}

/// The variable name on an assignment line, without annotation colon or
/// `self.` prefix.
pub fn variable_hint_target(line_text: &str) -> String {
    let target = line_text.split('=').next().unwrap_or_default();
    target
        .replacen(':', "", 1)
        .replacen("self.", "", 1)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infer::{FunctionInferData, VariableInferData};
    use indexmap::IndexMap;

    const SOURCE: &str = r#"class Foo:
    label = "x"

    def __init__(self, count, flag):
        self.count = count

    def size(self) -> int:
        return self.count

def bar(items):
    res = []
    return res
"#;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn data() -> InferData {
        InferData {
            functions: vec![
                FunctionInferData {
                    name: "__init__".into(),
                    lines: (4, 5),
                    return_types: strings(&["None"]),
                    params: IndexMap::from([
                        ("count".to_string(), strings(&["int", "bool", "float"])),
                        ("flag".to_string(), strings(&["bool"])),
                    ]),
                },
                FunctionInferData {
                    name: "size".into(),
                    lines: (7, 8),
                    return_types: strings(&["int", "Optional[str]"]),
                    params: IndexMap::new(),
                },
                FunctionInferData {
                    name: "bar".into(),
                    lines: (10, 12),
                    return_types: strings(&["List[int]", "List[str]"]),
                    params: IndexMap::from([("items".to_string(), strings(&["List[int]"]))]),
                },
            ],
            variables: vec![
                VariableInferData {
                    name: "label".into(),
                    lines: (2, 2),
                    annotations: strings(&["str"]),
                },
                VariableInferData {
                    name: "count".into(),
                    lines: (5, 5),
                    annotations: strings(&["int"]),
                },
                VariableInferData {
                    name: "res".into(),
                    lines: (11, 11),
                    annotations: strings(&["List[str]", "list"]),
                },
            ],
        }
    }

    /// Replace the 0-based `line` of SOURCE with `typed`.
    fn editing(line: usize, typed: &str) -> String {
        SOURCE
            .lines()
            .enumerate()
            .map(|(i, l)| if i == line { typed } else { l })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn annotations(items: &[HintCandidate]) -> Vec<&str> {
        items.iter().map(|c| c.annotation.as_str()).collect()
    }

    #[test]
    fn test_param_hints_on_def_line() {
        let doc = editing(9, "def bar(items:");
        let cursor = Cursor::new(&doc, 9, 14);
        let items = complete(&data(), &cursor, ':');

        assert_eq!(annotations(&items), ["List[int]"]);
        assert_eq!(items[0].slot, TypeSlot::Parameter);
        assert_eq!(items[0].identifier, "items");
        assert_eq!(items[0].line, 10);
        assert_eq!(items[0].rank, 1);
    }

    #[test]
    fn test_param_hints_keep_rank_order() {
        let doc = editing(3, "    def __init__(self, count:");
        let cursor = Cursor::new(&doc, 3, 29);
        let items = parameter_hints(&data(), &cursor);

        assert_eq!(annotations(&items), ["int", "bool", "float"]);
        let ranks: Vec<_> = items.iter().map(|c| c.rank).collect();
        assert_eq!(ranks, [1, 2, 3]);
        assert_eq!(items[2].sort_text, "2");
    }

    #[test]
    fn test_param_hints_multiline_signature() {
        let head: Vec<&str> = SOURCE.lines().take(9).collect();
        let doc = format!("{}\ndef bar(\n    items:", head.join("\n"));
        let cursor = Cursor::new(&doc, 10, 10);
        assert_eq!(cursor.line_text(), "    items:");

        let items = parameter_hints(&data(), &cursor);
        assert_eq!(annotations(&items), ["List[int]"]);
        assert_eq!(items[0].line, 11);
    }

    #[test]
    fn test_param_hints_unknown_function() {
        let doc = format!("{}\ndef new_foo(x:", SOURCE.trim_end());
        let cursor = Cursor::new(&doc, 12, 14);
        assert!(parameter_hints(&data(), &cursor).is_empty());
    }

    #[test]
    fn test_param_hints_unknown_parameter() {
        let doc = editing(9, "def bar(other:");
        let cursor = Cursor::new(&doc, 9, 14);
        assert!(parameter_hints(&data(), &cursor).is_empty());
    }

    #[test]
    fn test_param_hints_ignore_comments_and_column_zero() {
        assert!(!should_provide_param_hints("def f(x # note", ""));
        let doc = editing(9, ":");
        assert!(parameter_hints(&data(), &Cursor::new(&doc, 9, 0)).is_empty());
    }

    #[test]
    fn test_return_hints() {
        let doc = editing(6, "    def size(self) ->");
        let cursor = Cursor::new(&doc, 6, 21);
        let items = complete(&data(), &cursor, '>');

        assert_eq!(annotations(&items), ["int", "Optional[str]"]);
        assert_eq!(items[0].slot, TypeSlot::ReturnType);
        assert_eq!(items[0].identifier, "size");
    }

    #[test]
    fn test_return_hints_no_data() {
        let doc = format!("{}\ndef new_foo(x) ->", SOURCE.trim_end());
        let cursor = Cursor::new(&doc, 12, 17);
        assert!(return_hints(&data(), &cursor).is_empty());
    }

    #[test]
    fn test_should_provide_return_hints() {
        assert!(should_provide_return_hints("def f() ->", 10));
        assert!(should_provide_return_hints("def f()  -> :", 11));
        assert!(!should_provide_return_hints("def f() ->", 9));
        assert!(!should_provide_return_hints("x ->", 4));
        assert!(!should_provide_return_hints("->", 1));
    }

    #[test]
    fn test_variable_hints() {
        let doc = editing(1, "    label: = \"x\"");
        let cursor = Cursor::new(&doc, 1, 10);
        let items = complete(&data(), &cursor, ':');

        assert_eq!(annotations(&items), ["str"]);
        assert_eq!(items[0].slot, TypeSlot::Variable);
        assert_eq!(items[0].identifier, "label");
    }

    #[test]
    fn test_variable_hints_strip_self() {
        let doc = editing(4, "        self.count: = count");
        let cursor = Cursor::new(&doc, 4, 19);
        assert_eq!(annotations(&variable_hints(&data(), &cursor)), ["int"]);
    }

    #[test]
    fn test_variable_hints_function_level() {
        let doc = editing(10, "    res: = []");
        let cursor = Cursor::new(&doc, 10, 8);
        assert_eq!(
            annotations(&variable_hints(&data(), &cursor)),
            ["List[str]", "list"]
        );
    }

    #[test]
    fn test_variable_hints_no_data() {
        let doc = format!("{}\nzxc: = 10", SOURCE.trim_end());
        let cursor = Cursor::new(&doc, 12, 4);
        assert!(variable_hints(&data(), &cursor).is_empty());
    }

    #[test]
    fn test_param_hint_target() {
        assert_eq!(param_hint_target("def f(x"), Some("x"));
        assert_eq!(param_hint_target("def f(self, value"), Some("value"));
        assert_eq!(param_hint_target("def f(*args"), Some("args"));
        assert_eq!(param_hint_target("items"), Some("items"));
        assert_eq!(param_hint_target("def f"), None);
        assert_eq!(param_hint_target("def f(x.y"), None);
        assert_eq!(param_hint_target("def f("), None);
        assert_eq!(param_hint_target("def f(x£"), None);
        assert_eq!(param_hint_target("def f(größe"), Some("größe"));
    }

    #[test]
    fn test_signature_detection() {
        assert!(should_provide_param_hints("def f(x", ""));
        assert!(should_provide_param_hints("async  def f(x", ""));
        assert!(should_provide_param_hints("x", "def f(\n    x"));
        assert!(should_provide_param_hints("y", "  async def f(\n  x,\n  y"));
        assert!(!should_provide_param_hints("x", "def f():\n    x"));
        assert!(!should_provide_param_hints("x", "def f() -> int:\n    x"));
        assert!(!should_provide_param_hints("x", "y = 1\n    x"));
        // A closed def followed by an open one still counts as open.
        assert!(should_provide_param_hints("y", "def f():\n    pass\ndef g(\n    y"));
        assert!(!should_provide_param_hints("x", "undefined = 1\n    x"));
    }

    #[test]
    fn test_variable_target() {
        assert_eq!(variable_hint_target("    self.a: = 3"), "a");
        assert_eq!(variable_hint_target("total : = 0"), "total");
        assert!(should_provide_variable_hints(": = 1"));
        assert!(should_provide_variable_hints(":=1"));
        assert!(!should_provide_variable_hints(": int"));
    }

    #[test]
    fn test_cursor_from_utf16() {
        let text = "x = 1\n\u{1F600}é: = 2";
        assert_eq!(Cursor::from_utf16(text, 0, 3).character, 3);
        // The emoji is two UTF-16 units, the accent one.
        assert_eq!(Cursor::from_utf16(text, 1, 4).character, 3);
        assert_eq!(Cursor::from_utf16(text, 1, 1).character, 1);
        assert_eq!(Cursor::from_utf16(text, 1, 99).character, 7);
    }

    #[test]
    fn test_param_hints_after_wide_chars() {
        let typed = format!("{}\ndef bar(\u{1F40D}, items:", SOURCE.trim_end());
        let mut data = data();
        data.functions[2].lines = (10, 13);

        // "def bar(" is 8 units, the snake 2, ", items:" 8.
        let cursor = Cursor::from_utf16(&typed, 12, 18);
        assert_eq!(cursor.character, 17);
        assert_eq!(annotations(&parameter_hints(&data, &cursor)), ["List[int]"]);
    }

    #[test]
    fn test_unknown_trigger() {
        let cursor = Cursor::new(SOURCE, 0, 3);
        assert!(complete(&data(), &cursor, '.').is_empty());
    }

    #[test]
    fn test_slot_display() {
        assert_eq!(TypeSlot::ReturnType.to_string(), "ReturnType");
        assert_eq!(
            serde_json::to_string(&TypeSlot::Parameter).unwrap(),
            "\"Parameter\""
        );
    }
}
