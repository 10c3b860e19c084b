//! Where encoded tokens come from.

use anyhow::{Context, Result};
use scraper::{Html, Selector};
use serde_json::Value;
use std::path::Path;

use super::token::EncodedToken;

/// Supplies the page's encoded token collection.
///
/// Returns `None` when the collection is absent or not list-shaped; the
/// decoder then contributes nothing.
pub trait TokenSource {
    fn collect_encoded_tokens(&self) -> Option<Vec<EncodedToken>>;
}

/// No token collection at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTokens;

impl TokenSource for NoTokens {
    fn collect_encoded_tokens(&self) -> Option<Vec<EncodedToken>> {
        None
    }
}

/// Tokens captured out-of-band as a JSON document (e.g. dumped from a browser session).
#[derive(Debug, Clone, PartialEq)]
pub struct JsonTokenSource {
    value: Option<Value>,
}

impl JsonTokenSource {
    pub fn from_value(value: Value) -> Self {
        Self { value: Some(value) }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read token file: {}", path.display()))?;
        let value: Value = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse token JSON: {}", path.display()))?;
        Ok(Self::from_value(value))
    }
}

impl TokenSource for JsonTokenSource {
    fn collect_encoded_tokens(&self) -> Option<Vec<EncodedToken>> {
        match &self.value {
            Some(Value::Array(items)) => Some(items.iter().cloned().map(EncodedToken).collect()),
            Some(other) => {
                tracing::debug!("token JSON is not an array ({}), ignoring", kind(other));
                None
            }
            None => None,
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Reads the token array straight out of the page's inline scripts.
///
/// Understands `NAME = [..]` assignments (each resets the collection) and
/// `NAME.push(..)` calls with literal arguments, applied in document order.
#[derive(Debug, Clone)]
pub struct ScriptArraySource {
    scripts: Vec<String>,
    variable: String,
}

impl ScriptArraySource {
    pub fn new(scripts: Vec<String>, variable: impl Into<String>) -> Self {
        Self {
            scripts,
            variable: variable.into(),
        }
    }

    /// Collects the text of every inline `<script>` in the document.
    pub fn from_document(document: &Html, variable: impl Into<String>) -> Self {
        let scripts = match Selector::parse("script") {
            Ok(sel) => document
                .select(&sel)
                .filter(|s| s.value().attr("src").is_none())
                .map(|s| s.text().collect::<String>())
                .collect(),
            Err(_) => Vec::new(),
        };
        Self::new(scripts, variable)
    }
}

impl TokenSource for ScriptArraySource {
    fn collect_encoded_tokens(&self) -> Option<Vec<EncodedToken>> {
        if self.variable.is_empty() {
            return None;
        }
        let mut tokens: Option<Vec<Value>> = None;
        for script in &self.scripts {
            for stmt in find_statements(script, &self.variable) {
                match stmt {
                    Statement::Assign(Some(items)) => tokens = Some(items),
                    // Assigned something other than an array literal: not list-shaped.
                    Statement::Assign(None) => tokens = None,
                    Statement::Push(items) => {
                        if let Some(list) = tokens.as_mut() {
                            list.extend(items);
                        }
                    }
                }
            }
        }
        let tokens = tokens?;
        tracing::debug!(
            variable = %self.variable,
            count = tokens.len(),
            "found token array in page scripts"
        );
        Some(tokens.into_iter().map(EncodedToken).collect())
    }
}

#[derive(Debug, PartialEq)]
enum Statement {
    Assign(Option<Vec<Value>>),
    Push(Vec<Value>),
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// All assignments to / pushes onto `name` in `script`, in source order.
fn find_statements(script: &str, name: &str) -> Vec<Statement> {
    let mut out = Vec::new();
    let mut from = 0;
    while let Some(rel) = script[from..].find(name) {
        let start = from + rel;
        let end = start + name.len();
        from = end;

        let before_ok = script[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !is_ident_char(c));
        let after_ok = script[end..].chars().next().map_or(true, |c| !is_ident_char(c));
        if !before_ok || !after_ok {
            continue;
        }

        let rest = script[end..].trim_start();
        let consumed = script.len() - end - rest.len();
        if let Some(rhs) = rest.strip_prefix('=') {
            if rhs.starts_with('=') {
                continue;
            }
            let rhs_trimmed = rhs.trim_start();
            let rhs_at = end + consumed + 1 + (rhs.len() - rhs_trimmed.len());
            if rhs_trimmed.starts_with('[') {
                match closing_index(script, rhs_at, '[', ']') {
                    Some(close) => {
                        out.push(Statement::Assign(parse_literal_list(
                            &script[rhs_at + 1..close],
                        )));
                        from = close + 1;
                    }
                    None => out.push(Statement::Assign(None)),
                }
            } else if let Some(ctor_len) = array_constructor_len(rhs_trimmed) {
                let open = rhs_at + ctor_len;
                match closing_index(script, open, '(', ')') {
                    Some(close) => {
                        out.push(Statement::Assign(constructor_items(&script[open + 1..close])));
                        from = close + 1;
                    }
                    None => out.push(Statement::Assign(None)),
                }
            } else {
                out.push(Statement::Assign(None));
            }
        } else if let Some(call) = rest.strip_prefix(".push") {
            let call_trimmed = call.trim_start();
            if !call_trimmed.starts_with('(') {
                continue;
            }
            let open = end + consumed + 5 + (call.len() - call_trimmed.len());
            if let Some(close) = closing_index(script, open, '(', ')') {
                if let Some(items) = parse_literal_list(&script[open + 1..close]) {
                    out.push(Statement::Push(items));
                }
                from = close + 1;
            }
        }
    }
    out
}

/// Byte length of a leading `new Array` / `Array` up to (not including) its `(`.
fn array_constructor_len(rhs: &str) -> Option<usize> {
    let after_new = match rhs.strip_prefix("new") {
        Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim_start(),
        _ => rhs,
    };
    let after_ctor = after_new.strip_prefix("Array")?;
    let paren = after_ctor.trim_start();
    if !paren.starts_with('(') {
        return None;
    }
    Some(rhs.len() - paren.len())
}

/// Elements produced by `Array(args)`: no args is empty, a single number is a
/// sparse array of that length (not a token list), anything else lists its args.
fn constructor_items(args: &str) -> Option<Vec<Value>> {
    let items = parse_literal_list(args)?;
    match items.as_slice() {
        [Value::Number(_)] => None,
        _ => Some(items),
    }
}

/// Index of the bracket closing the one at `open`, skipping string literals.
fn closing_index(text: &str, open: usize, open_ch: char, close_ch: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in text[open..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            c if c == open_ch => depth += 1,
            c if c == close_ch => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parses a comma-separated list of JS literals (the inside of `[..]` or `(..)`).
fn parse_literal_list(inner: &str) -> Option<Vec<Value>> {
    let json = format!("[{}]", js_literals_to_json(inner)?);
    serde_json::from_str::<Vec<Value>>(&json).ok()
}

/// Rewrites single-quoted and template strings as JSON strings and drops a trailing comma.
fn js_literals_to_json(src: &str) -> Option<String> {
    let mut out = String::with_capacity(src.len());
    let mut chars = src.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\'' | '`' | '"' => {
                let mut content = String::new();
                let mut closed = false;
                while let Some(d) = chars.next() {
                    match d {
                        '\\' => {
                            let e = chars.next()?;
                            match e {
                                'n' => content.push('\n'),
                                't' => content.push('\t'),
                                'r' => content.push('\r'),
                                '/' | '\\' | '\'' | '"' | '`' => content.push(e),
                                'u' => {
                                    let hex: String = chars.by_ref().take(4).collect();
                                    let code = u32::from_str_radix(&hex, 16).ok()?;
                                    content.push(char::from_u32(code)?);
                                }
                                other => content.push(other),
                            }
                        }
                        d if d == c => {
                            closed = true;
                            break;
                        }
                        d => content.push(d),
                    }
                }
                if !closed {
                    return None;
                }
                out.push_str(&serde_json::to_string(&content).ok()?);
            }
            ',' => {
                let rest: String = chars.clone().collect();
                if !rest.trim().is_empty() {
                    out.push(',');
                }
            }
            c => out.push(c),
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tokens(source: &impl TokenSource) -> Option<Vec<String>> {
        source
            .collect_encoded_tokens()
            .map(|t| t.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn json_array_source() {
        let src = JsonTokenSource::from_value(json!(["a", "b"]));
        assert_eq!(tokens(&src), Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn json_non_array_is_absent() {
        assert!(JsonTokenSource::from_value(json!({"a": 1}))
            .collect_encoded_tokens()
            .is_none());
        assert!(JsonTokenSource::from_value(json!("abc"))
            .collect_encoded_tokens()
            .is_none());
    }

    #[test]
    fn json_from_file() {
        use std::io::Write;
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(br#"["t1", "t2", "t3"]"#).unwrap();
        f.flush().unwrap();
        let src = JsonTokenSource::from_path(f.path()).unwrap();
        assert_eq!(src.collect_encoded_tokens().unwrap().len(), 3);
    }

    #[test]
    fn json_from_bad_file_errs() {
        use std::io::Write;
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"not json").unwrap();
        f.flush().unwrap();
        assert!(JsonTokenSource::from_path(f.path()).is_err());
    }

    #[test]
    fn script_assignment_with_single_quotes() {
        let script = r#"
            var other = 1;
            var _q1HQcHOD6h8 = ['abc', "d\"ef", 'g\'h',];
        "#;
        let src = ScriptArraySource::new(vec![script.to_string()], "_q1HQcHOD6h8");
        assert_eq!(
            tokens(&src),
            Some(vec!["abc".to_string(), "d\"ef".to_string(), "g'h".to_string()])
        );
    }

    #[test]
    fn script_push_calls_append_in_order() {
        let scripts = vec![
            "var pages = [];".to_string(),
            "pages.push('p1'); pages.push( 'p2' ); other.pages.length;".to_string(),
            "pages.push(\"p3\");".to_string(),
        ];
        let src = ScriptArraySource::new(scripts, "pages");
        assert_eq!(
            tokens(&src),
            Some(vec!["p1".to_string(), "p2".to_string(), "p3".to_string()])
        );
    }

    #[test]
    fn script_new_array_then_push() {
        let script = "var _q1HQcHOD6h8 = new Array();\n_q1HQcHOD6h8.push('tok1');\n_q1HQcHOD6h8.push('tok2');";
        let src = ScriptArraySource::new(vec![script.to_string()], "_q1HQcHOD6h8");
        assert_eq!(tokens(&src), Some(vec!["tok1".to_string(), "tok2".to_string()]));
    }

    #[test]
    fn script_array_constructor_forms() {
        let src = ScriptArraySource::new(vec!["var t = Array ( );t.push('a');".to_string()], "t");
        assert_eq!(tokens(&src), Some(vec!["a".to_string()]));

        let src = ScriptArraySource::new(vec!["var t = new Array('x', 'y');".to_string()], "t");
        assert_eq!(tokens(&src), Some(vec!["x".to_string(), "y".to_string()]));

        let src = ScriptArraySource::new(vec!["var t = new Array(3);".to_string()], "t");
        assert!(src.collect_encoded_tokens().is_none());
    }

    #[test]
    fn script_other_constructor_is_absent() {
        let src = ScriptArraySource::new(vec!["var t = new Map(); t.push('a');".to_string()], "t");
        assert!(src.collect_encoded_tokens().is_none());
    }

    #[test]
    fn script_brackets_inside_strings() {
        let script = "window.imgs = ['a]b', 'c[d'];";
        let src = ScriptArraySource::new(vec![script.to_string()], "imgs");
        assert_eq!(tokens(&src), Some(vec!["a]b".to_string(), "c[d".to_string()]));
    }

    #[test]
    fn script_variable_missing_is_absent() {
        let src = ScriptArraySource::new(vec!["var x = ['a'];".to_string()], "pages");
        assert!(src.collect_encoded_tokens().is_none());
    }

    #[test]
    fn script_identifier_prefix_does_not_match() {
        let src = ScriptArraySource::new(vec!["var pages2 = ['a'];".to_string()], "pages");
        assert!(src.collect_encoded_tokens().is_none());
    }

    #[test]
    fn script_non_array_assignment_is_absent() {
        let src = ScriptArraySource::new(vec!["var pages = 'abc';".to_string()], "pages");
        assert!(src.collect_encoded_tokens().is_none());
    }

    #[test]
    fn script_comparison_is_not_assignment() {
        let script = "var pages = ['a']; if (pages == null) {}";
        let src = ScriptArraySource::new(vec![script.to_string()], "pages");
        assert_eq!(tokens(&src), Some(vec!["a".to_string()]));
    }

    #[test]
    fn from_document_skips_external_scripts() {
        let html = r#"<html><head>
            <script src="/app.js">var pages = ['ignored'];</script>
            <script>var pages = ['x', 'y'];</script>
        </head><body></body></html>"#;
        let doc = Html::parse_document(html);
        let src = ScriptArraySource::from_document(&doc, "pages");
        assert_eq!(tokens(&src), Some(vec!["x".to_string(), "y".to_string()]));
    }

    #[test]
    fn script_float_literals_print_like_the_page() {
        let src = ScriptArraySource::new(vec!["var t = [1e3, 2.0];".to_string()], "t");
        assert_eq!(tokens(&src), Some(vec!["1000".to_string(), "2".to_string()]));
    }

    #[test]
    fn numbers_survive() {
        let src = ScriptArraySource::new(vec!["var t = [1, 'a'];".to_string()], "t");
        assert_eq!(tokens(&src), Some(vec!["1".to_string(), "a".to_string()]));
    }
}
