//! Classification of statement lines and construct headers.

use bp_ir::vocab;

/// What a line ending in `{` opens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Header {
    If(Option<String>),
    ElseIf(Option<String>),
    Else,
    /// `repeat(n)`; `None` when `n` is not a non-negative integer.
    Repeat(Option<u32>),
    /// `for (...)`; `None` when the bounds are not integer literals.
    For(Option<u32>),
    While(Option<String>),
    Unknown,
}

pub(crate) fn classify(text: &str) -> Header {
    let head = text.strip_suffix('{').unwrap_or(text).trim_end();

    if let Some(rest) = keyword(head, "else") {
        let rest = rest.trim_start();
        if rest.is_empty() {
            return Header::Else;
        }
        return match call_args(rest, "if") {
            Some(args) => Header::ElseIf(condition(args)),
            None => Header::Unknown,
        };
    }
    if let Some(args) = call_args(head, "if") {
        return Header::If(condition(args));
    }
    if let Some(args) = call_args(head, "while") {
        return Header::While(condition(args));
    }
    if let Some(args) = call_args(head, "repeat") {
        return Header::Repeat(args.trim().parse().ok());
    }
    if let Some(args) = call_args(head, "for") {
        return Header::For(for_count(args));
    }
    Header::Unknown
}

/// Kind of an action statement such as `await moveForward()`.
pub(crate) fn statement_kind(text: &str) -> Option<&'static str> {
    let text = text.trim().trim_end_matches(';').trim_end();
    let text = keyword(text, "await").map_or(text, str::trim_start);
    call_name(text).and_then(vocab::action_kind)
}

/// Condition kind for the text between a header's parentheses.
///
/// A vocabulary call maps to its kind, any other bare call keeps its callee
/// name, and anything else is kept verbatim. Empty parentheses mean no
/// condition.
fn condition(args: &str) -> Option<String> {
    let text = args.trim();
    let text = keyword(text, "await").map_or(text, str::trim_start);
    if text.is_empty() {
        return None;
    }
    let kind = match call_name(text) {
        Some(name) => vocab::condition_kind(name).unwrap_or(name),
        None => text,
    };
    Some(kind.to_owned())
}

/// Loop count of `let i = A; i < B; i++`, clamped at zero.
///
/// The test may be `<`, `<=`, `>` or `>=`; the update must step the
/// variable by one towards the bound (`i++`, `++i`, `i += 1`, or the
/// decrementing forms for `>`/`>=`).
fn for_count(args: &str) -> Option<u32> {
    let mut parts = args.split(';');
    let (init, test, update) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let init = init.trim();
    let init = ["let", "var", "const"]
        .iter()
        .find_map(|kw| keyword(init, kw))
        .map_or(init, str::trim_start);
    let (var, start) = init.split_once('=')?;
    let var = var.trim();
    let start: i64 = start.trim().parse().ok()?;

    let (lhs, op, bound) = comparison(test)?;
    if lhs.trim() != var || !is_identifier(var) {
        return None;
    }
    let bound: i64 = bound.trim().parse().ok()?;

    let count = match (op, unit_step(update, var)?) {
        ("<", Step::Up) => bound.saturating_sub(start),
        ("<=", Step::Up) => bound.saturating_sub(start).saturating_add(1),
        (">", Step::Down) => start.saturating_sub(bound),
        (">=", Step::Down) => start.saturating_sub(bound).saturating_add(1),
        _ => return None,
    };
    Some(u32::try_from(count.max(0)).unwrap_or(u32::MAX))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Step {
    Up,
    Down,
}

/// Split `lhs OP rhs` at the first relational operator.
fn comparison(test: &str) -> Option<(&str, &str, &str)> {
    let at = test.find(['<', '>'])?;
    let len = if test[at + 1..].starts_with('=') { 2 } else { 1 };
    Some((&test[..at], &test[at..at + len], &test[at + len..]))
}

fn unit_step(update: &str, var: &str) -> Option<Step> {
    let update: String = update.split_whitespace().collect();
    let op = update
        .strip_prefix(var)
        .or_else(|| update.strip_suffix(var))?;
    match op {
        "++" | "+=1" => Some(Step::Up),
        "--" | "-=1" => Some(Step::Down),
        _ => None,
    }
}

/// Strip `word` from the front of `text` if it stands alone as a word.
fn keyword<'t>(text: &'t str, word: &str) -> Option<&'t str> {
    let rest = text.strip_prefix(word)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() || c == '(' => Some(rest),
        Some(_) => None,
    }
}

/// Inner text of `word (...)` when nothing follows the closing paren.
fn call_args<'t>(text: &'t str, word: &str) -> Option<&'t str> {
    let rest = keyword(text, word)?.trim_start();
    let (inner, after) = parenthesized(rest)?;
    after.trim().is_empty().then_some(inner)
}

/// Split `(inner) after` at the paren matching the first one.
fn parenthesized(text: &str) -> Option<(&str, &str)> {
    let body = text.strip_prefix('(')?;
    let mut depth = 1usize;
    for (i, c) in body.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&body[..i], &body[i + 1..]));
                }
            }
            _ => {}
        }
    }
    None
}

/// Callee of an argument-less call `name()`.
fn call_name(text: &str) -> Option<&str> {
    let open = text.find('(')?;
    let name = text[..open].trim_end();
    let (args, after) = parenthesized(&text[open..])?;
    (args.trim().is_empty() && after.trim().is_empty() && is_identifier(name)).then_some(name)
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
