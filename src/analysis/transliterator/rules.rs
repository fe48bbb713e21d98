//! Transliteration rule set parsing.
//!
//! A rule resource is a sequence of statements terminated by `;`:
//!
//! ```text
//! # modern Japanese form to traditional form
//! 両 > 兩 ;
//! e ́ <> é ;
//! 'a b' > ab ;
//! ```
//!
//! - `>` applies a rule forward, `<` applies it in reverse, `<>` both ways.
//! - Whitespace between characters is ignored; quote with `'...'` to keep it.
//!   `''` is a literal apostrophe.
//! - `\uXXXX` and `\UXXXXXXXX` are codepoint escapes; a backslash before any
//!   other character makes that character literal.
//! - `#` starts a comment that runs to the end of the line.
//!
//! Context, variables and character-class syntax are not supported: an
//! unquoted `{`, `}`, `[`, `]`, `|`, `$` or `:` is a configuration error.

use crate::config::Direction;
use crate::error::{CjkAnalysisError, Result};

/// A single rewrite: `source` characters become `target` characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub source: Vec<char>,
    pub target: Vec<char>,
}

/// The rules of one resource, oriented for a single direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    id: String,
    direction: Direction,
    rules: Vec<Rule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Forward,
    Reverse,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Item {
    Char(char),
    Op(Operator),
}

impl RuleSet {
    /// Parse rule text and keep the rules that apply in `direction`.
    pub fn parse(id: &str, text: &str, direction: Direction) -> Result<Self> {
        let mut rules = Vec::new();
        for (line, items) in Lexer::new(id, text).statements()? {
            if let Some(rule) = orient(id, line, &items, direction)? {
                rules.push(rule);
            }
        }

        Ok(RuleSet {
            id: id.to_string(),
            direction,
            rules,
        })
    }

    pub fn from_rules<S: Into<String>>(id: S, direction: Direction, rules: Vec<Rule>) -> Self {
        RuleSet {
            id: id.into(),
            direction,
            rules,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn orient(id: &str, line: usize, items: &[Item], direction: Direction) -> Result<Option<Rule>> {
    let ops: Vec<(usize, Operator)> = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match item {
            Item::Op(op) => Some((i, *op)),
            Item::Char(_) => None,
        })
        .collect();

    let (split, op) = match ops.as_slice() {
        [single] => *single,
        [] => return Err(syntax_error(id, line, "missing '>', '<' or '<>' operator")),
        _ => return Err(syntax_error(id, line, "more than one operator in a rule")),
    };

    let chars = |items: &[Item]| -> Vec<char> {
        items
            .iter()
            .filter_map(|item| match item {
                Item::Char(c) => Some(*c),
                Item::Op(_) => None,
            })
            .collect()
    };
    let lhs = chars(&items[..split]);
    let rhs = chars(&items[split + 1..]);

    let (applies, source, target) = match (op, direction) {
        (Operator::Forward | Operator::Both, Direction::Forward) => (true, lhs.clone(), rhs.clone()),
        (Operator::Reverse | Operator::Both, Direction::Reverse) => (true, rhs.clone(), lhs.clone()),
        _ => (false, Vec::new(), Vec::new()),
    };

    // Both sides of a two-way rule must be usable as a source.
    if op == Operator::Both && (lhs.is_empty() || rhs.is_empty()) {
        return Err(syntax_error(id, line, "both sides of a '<>' rule must be non-empty"));
    }
    if !applies {
        return Ok(None);
    }
    if source.is_empty() {
        return Err(syntax_error(id, line, "rule has an empty source"));
    }

    Ok(Some(Rule { source, target }))
}

fn syntax_error(id: &str, line: usize, msg: &str) -> CjkAnalysisError {
    CjkAnalysisError::configuration(format!("rule set '{id}', line {line}: {msg}"))
}

struct Lexer<'a> {
    id: &'a str,
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(id: &'a str, text: &'a str) -> Self {
        Lexer {
            id,
            chars: text.chars().peekable(),
            line: 1,
        }
    }

    /// Split the text into statements, each tagged with the line it starts on.
    fn statements(mut self) -> Result<Vec<(usize, Vec<Item>)>> {
        let mut statements = Vec::new();
        let mut items = Vec::new();
        let mut start_line = self.line;

        while let Some(c) = self.chars.next() {
            if items.is_empty() {
                start_line = self.line;
            }
            match c {
                '\n' => self.line += 1,
                c if c.is_whitespace() => {}
                '#' => {
                    while let Some(&next) = self.chars.peek() {
                        if next == '\n' {
                            break;
                        }
                        self.chars.next();
                    }
                }
                ';' => {
                    if !items.is_empty() {
                        statements.push((start_line, std::mem::take(&mut items)));
                    }
                }
                '\'' => self.quoted(&mut items)?,
                '\\' => items.push(Item::Char(self.escape()?)),
                '>' | '→' => items.push(Item::Op(Operator::Forward)),
                '↔' => items.push(Item::Op(Operator::Both)),
                '←' => items.push(Item::Op(Operator::Reverse)),
                '<' => {
                    if self.chars.peek() == Some(&'>') {
                        self.chars.next();
                        items.push(Item::Op(Operator::Both));
                    } else {
                        items.push(Item::Op(Operator::Reverse));
                    }
                }
                '{' | '}' | '[' | ']' | '|' | '$' | ':' => {
                    return Err(syntax_error(
                        self.id,
                        self.line,
                        &format!("unsupported rule syntax '{c}'"),
                    ));
                }
                c => items.push(Item::Char(c)),
            }
        }

        // A trailing statement without ';' is accepted.
        if !items.is_empty() {
            statements.push((start_line, items));
        }

        Ok(statements)
    }

    fn quoted(&mut self, items: &mut Vec<Item>) -> Result<()> {
        // '' outside a quoted run is a literal apostrophe.
        if self.chars.peek() == Some(&'\'') {
            self.chars.next();
            items.push(Item::Char('\''));
            return Ok(());
        }

        loop {
            match self.chars.next() {
                Some('\'') => {
                    if self.chars.peek() == Some(&'\'') {
                        self.chars.next();
                        items.push(Item::Char('\''));
                    } else {
                        return Ok(());
                    }
                }
                Some('\\') => items.push(Item::Char(self.escape()?)),
                Some(c) => {
                    if c == '\n' {
                        self.line += 1;
                    }
                    items.push(Item::Char(c));
                }
                None => return Err(syntax_error(self.id, self.line, "unterminated quote")),
            }
        }
    }

    fn escape(&mut self) -> Result<char> {
        let digits = match self.chars.next() {
            Some('u') => 4,
            Some('U') => 8,
            Some(c) => return Ok(c),
            None => return Err(syntax_error(self.id, self.line, "dangling backslash")),
        };

        let mut value = 0u32;
        for _ in 0..digits {
            let digit = self
                .chars
                .next()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| syntax_error(self.id, self.line, "malformed codepoint escape"))?;
            value = value * 16 + digit;
        }

        char::from_u32(value).ok_or_else(|| {
            syntax_error(
                self.id,
                self.line,
                &format!("escape U+{value:04X} is not a Unicode scalar value"),
            )
        })
    }
}
