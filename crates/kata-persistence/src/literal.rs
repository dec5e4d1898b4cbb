//! Rendering and loading of the record database module.
//!
//! The record database is a single TypeScript module exporting one constant:
//!
//! ```text
//! export const userCompletedDB = { "two-sum": { id: "5a2b", languages: ["python"] } }
//! ```
//!
//! Rendering is deterministic and follows a fixed style: no semicolons, no
//! trailing commas, two-space indentation, double quotes unless a string
//! holds more double quotes than single ones, and groups that exceed the
//! print width broken one entry per line.

use serde_json::{Map, Number, Value};
use swc_common::{BytePos, Span, Spanned};
use swc_ecma_ast::{
    Decl, Expr, ExprOrSpread, Lit, ModuleDecl, ModuleItem, Pat, Prop, PropName, PropOrSpread,
    Str, UnaryOp, VarDeclKind,
};
use swc_ecma_parser::{error::Error as ParseError, EsSyntax, Parser, StringInput, Syntax};
use unicode_width::UnicodeWidthStr;

use crate::error::{PersistenceError, Result};

/// Key that an object initializer treats as a prototype setter unless the
/// key is computed.
const PROTO_KEY: &str = "__proto__";

/// Words that cannot name the exported binding.
const RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Source positions start at 1; 0 is swc's dummy position.
const START_POS: u32 = 1;

/// Fixed formatting options for rendered modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralStyle {
    /// Maximum line width before a group is broken.
    pub print_width: usize,
    /// Spaces per indentation level.
    pub indent_width: usize,
}

impl Default for LiteralStyle {
    fn default() -> Self {
        Self {
            print_width: 125,
            indent_width: 2,
        }
    }
}

impl LiteralStyle {
    /// Sets the print width.
    pub fn with_print_width(mut self, width: usize) -> Self {
        self.print_width = width;
        self
    }
}

/// Returns true when `name` can be declared with `export const <name>`.
pub fn is_valid_export_name(name: &str) -> bool {
    is_identifier(name) && !RESERVED_WORDS.contains(&name)
}

/// Renders `value` as `export const <export_name> = <literal>` plus a newline.
///
/// `export_name` must pass [`is_valid_export_name`].
pub fn render_module(export_name: &str, value: &Value, style: &LiteralStyle) -> String {
    let head = format!("export const {} = ", export_name);
    let mut printer = Printer {
        style,
        out: String::with_capacity(head.len() + 64),
    };
    printer.out.push_str(&head);
    printer.value(value, 0, width(&head), 0);
    printer.out.push('\n');
    printer.out
}

/// Parses a module produced by [`render_module`], returning the export name
/// and the exported value.
///
/// The source is parsed as an ECMAScript module; the module must consist of
/// exactly one `export const` whose initializer is a plain literal.
pub fn parse_module(source: &str) -> Result<(String, Value)> {
    let len = u32::try_from(source.len()).map_err(|_| PersistenceError::Literal {
        line: 0,
        column: 0,
        message: "module is too large".to_string(),
    })?;
    let input = StringInput::new(source, BytePos(START_POS), BytePos(START_POS + len));
    let mut parser = Parser::new(Syntax::Es(EsSyntax::default()), input, None);

    let module = parser
        .parse_module()
        .map_err(|e| syntax_error(source, &e))?;
    if let Some(e) = parser.take_errors().first() {
        return Err(syntax_error(source, e));
    }

    let [item] = module.body.as_slice() else {
        return Err(located(source, module.span, "expected a single export"));
    };
    let ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) = item else {
        return Err(located(source, item.span(), "expected `export const`"));
    };
    let Decl::Var(var) = &export.decl else {
        return Err(located(source, export.span, "expected `export const`"));
    };
    let [declarator] = var.decls.as_slice() else {
        return Err(located(source, var.span, "expected a single declarator"));
    };
    if var.kind != VarDeclKind::Const {
        return Err(located(source, var.span, "expected `export const`"));
    }
    let Pat::Ident(binding) = &declarator.name else {
        return Err(located(source, declarator.span, "expected an identifier binding"));
    };
    let Some(init) = &declarator.init else {
        return Err(located(source, declarator.span, "missing initializer"));
    };

    Ok((binding.id.sym.to_string(), expr_value(source, init)?))
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Display width in terminal columns.
fn width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Quotes a string, preferring double quotes.
fn quote(s: &str) -> String {
    let doubles = s.matches('"').count();
    let singles = s.matches('\'').count();
    let enclosing = if doubles > singles { '\'' } else { '"' };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(enclosing);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if c == enclosing => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c == '\u{2028}' || c == '\u{2029}' => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push(enclosing);
    out
}

fn entry_count(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        _ => 0,
    }
}

/// Whether a group must be broken regardless of width.
///
/// Arrays of two or more objects (or arrays) that each hold more than one
/// entry always break, and a forced break propagates to every enclosing
/// group.
fn must_break(value: &Value) -> bool {
    match value {
        Value::Array(items) => {
            let uniform_records = items.len() > 1
                && match &items[0] {
                    Value::Object(_) => items
                        .iter()
                        .all(|item| item.is_object() && entry_count(item) > 1),
                    Value::Array(_) => items
                        .iter()
                        .all(|item| item.is_array() && entry_count(item) > 1),
                    _ => false,
                };
            uniform_records || items.iter().any(must_break)
        }
        Value::Object(map) => map.values().any(must_break),
        _ => false,
    }
}

fn is_number_array(items: &[Value]) -> bool {
    !items.is_empty() && items.iter().all(Value::is_number)
}

struct Printer<'a> {
    style: &'a LiteralStyle,
    out: String,
}

impl Printer<'_> {
    /// Appends `value` starting at `column`; `trailing` is the width of text
    /// that must follow it on the same line.
    fn value(&mut self, value: &Value, depth: usize, column: usize, trailing: usize) {
        match value {
            Value::Array(items) if !items.is_empty() => {
                let flat = flat(value);
                if !must_break(value) && column + width(&flat) + trailing <= self.style.print_width {
                    self.out.push_str(&flat);
                } else if is_number_array(items) {
                    self.fill_numbers(items, depth);
                } else {
                    self.broken_array(items, depth);
                }
            }
            Value::Object(map) if !map.is_empty() => {
                let flat = flat(value);
                if !must_break(value) && column + width(&flat) + trailing <= self.style.print_width {
                    self.out.push_str(&flat);
                } else {
                    self.broken_object(map, depth);
                }
            }
            scalar => self.out.push_str(&flat(scalar)),
        }
    }

    fn newline(&mut self, depth: usize) -> usize {
        let pad = depth * self.style.indent_width;
        self.out.push('\n');
        self.out.extend(std::iter::repeat(' ').take(pad));
        pad
    }

    fn broken_array(&mut self, items: &[Value], depth: usize) {
        self.out.push('[');
        for (i, item) in items.iter().enumerate() {
            let last = i + 1 == items.len();
            let column = self.newline(depth + 1);
            self.value(item, depth + 1, column, usize::from(!last));
            if !last {
                self.out.push(',');
            }
        }
        self.newline(depth);
        self.out.push(']');
    }

    /// Packs numbers onto as few lines as fit.
    fn fill_numbers(&mut self, items: &[Value], depth: usize) {
        self.out.push('[');
        let mut column = self.newline(depth + 1);
        let line_start = column;
        for (i, item) in items.iter().enumerate() {
            let mut text = flat(item);
            if i + 1 < items.len() {
                text.push(',');
            }
            if column > line_start {
                if column + 1 + width(&text) > self.style.print_width {
                    column = self.newline(depth + 1);
                } else {
                    self.out.push(' ');
                    column += 1;
                }
            }
            column += width(&text);
            self.out.push_str(&text);
        }
        self.newline(depth);
        self.out.push(']');
    }

    fn broken_object(&mut self, map: &Map<String, Value>, depth: usize) {
        let quote_keys = needs_quoted_keys(map);
        self.out.push('{');
        for (i, (key, item)) in map.iter().enumerate() {
            let last = i + 1 == map.len();
            let column = self.newline(depth + 1);
            let key = render_key(key, quote_keys);
            self.out.push_str(&key);
            self.out.push_str(": ");
            self.value(item, depth + 1, column + width(&key) + 2, usize::from(!last));
            if !last {
                self.out.push(',');
            }
        }
        self.newline(depth);
        self.out.push('}');
    }
}

fn needs_quoted_keys(map: &Map<String, Value>) -> bool {
    map.keys().any(|k| k == PROTO_KEY || !is_identifier(k))
}

/// `__proto__` is always written as a computed key so that loading the
/// module defines an own property instead of replacing the prototype.
fn render_key(key: &str, quoted: bool) -> String {
    if key == PROTO_KEY {
        format!("[{}]", quote(key))
    } else if quoted {
        quote(key)
    } else {
        key.to_string()
    }
}

/// Single-line rendering of a value.
fn flat(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f == 0.0 && f.is_sign_negative() => "0".to_string(),
            _ => n.to_string(),
        },
        Value::String(s) => quote(s),
        Value::Array(items) if items.is_empty() => "[]".to_string(),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(flat).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Object(map) if map.is_empty() => "{}".to_string(),
        Value::Object(map) => {
            let quote_keys = needs_quoted_keys(map);
            let parts: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", render_key(k, quote_keys), flat(v)))
                .collect();
            format!("{{ {} }}", parts.join(", "))
        }
    }
}

fn syntax_error(source: &str, error: &ParseError) -> PersistenceError {
    located(source, error.span(), error.kind().msg())
}

/// Builds a positioned error from a span in `source`.
fn located(source: &str, span: Span, message: impl Into<String>) -> PersistenceError {
    let offset = span.lo.0.saturating_sub(START_POS) as usize;
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let column = before
        .rsplit('\n')
        .next()
        .map_or(0, |tail| tail.chars().count())
        + 1;
    PersistenceError::Literal {
        line,
        column,
        message: message.into(),
    }
}

fn expr_value(source: &str, expr: &Expr) -> Result<Value> {
    match expr {
        Expr::Object(object) => {
            let mut map = Map::new();
            for prop in &object.props {
                let PropOrSpread::Prop(prop) = prop else {
                    return Err(located(source, object.span, "spread is not a record value"));
                };
                let Prop::KeyValue(entry) = &**prop else {
                    return Err(located(source, prop.span(), "expected `key: value`"));
                };
                let key = prop_key(source, &entry.key)?;
                map.insert(key, expr_value(source, &entry.value)?);
            }
            Ok(Value::Object(map))
        }
        Expr::Array(array) => array
            .elems
            .iter()
            .map(|elem| match elem {
                Some(ExprOrSpread { spread: None, expr }) => expr_value(source, expr),
                _ => Err(located(source, array.span, "holes and spreads are not record values")),
            })
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Expr::Lit(Lit::Str(s)) => string_value(source, s).map(Value::String),
        Expr::Lit(Lit::Num(n)) => number_value(source, n, false),
        Expr::Lit(Lit::Bool(b)) => Ok(Value::Bool(b.value)),
        Expr::Lit(Lit::Null(_)) => Ok(Value::Null),
        Expr::Unary(unary) if unary.op == UnaryOp::Minus => match &*unary.arg {
            Expr::Lit(Lit::Num(n)) => number_value(source, n, true),
            other => Err(located(source, other.span(), "only numbers can be negated")),
        },
        other => Err(located(source, other.span(), "not a record literal")),
    }
}

fn prop_key(source: &str, name: &PropName) -> Result<String> {
    let key = match name {
        PropName::Ident(ident) => ident.sym.to_string(),
        PropName::Str(s) => string_value(source, s)?,
        PropName::Computed(computed) => {
            return match &*computed.expr {
                Expr::Lit(Lit::Str(s)) => string_value(source, s),
                other => Err(located(source, other.span(), "computed keys must be strings")),
            };
        }
        other => return Err(located(source, other.span(), "unsupported object key")),
    };
    if key == PROTO_KEY {
        return Err(located(
            source,
            name.span(),
            "non-computed `__proto__` sets the prototype instead of a property",
        ));
    }
    Ok(key)
}

fn string_value(source: &str, s: &Str) -> Result<String> {
    s.value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| located(source, s.span, "string holds a lone surrogate"))
}

/// Keeps integer precision by reparsing the literal's source text.
fn number_value(source: &str, n: &swc_ecma_ast::Number, negative: bool) -> Result<Value> {
    let exact = n.raw.as_ref().and_then(|raw| {
        let text = if negative {
            format!("-{}", raw)
        } else {
            raw.to_string()
        };
        text.parse::<Number>().ok()
    });
    if let Some(number) = exact {
        return Ok(Value::Number(number));
    }
    let value = if negative { -n.value } else { n.value };
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| located(source, n.span, "number is not finite"))
}
