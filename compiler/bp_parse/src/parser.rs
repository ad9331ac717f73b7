//! Block-structure recovery over logical lines.
//!
//! Bodies are found by brace counting: a construct's body runs from the line
//! after its header to the `}` that brings the count back to zero. Every
//! scan is bounded by the enclosing body's end, so a missing brace inside a
//! loop never swallows lines outside that loop.

use bp_diagnostic::ErrorCode;
use bp_ir::vocab::kinds;
use bp_ir::{ProgramNode, ProgramSequence};
use bp_stack::{ensure_sufficient_stack, Depth};
use tracing::{trace, warn};

use crate::header::{self, Header};
use crate::lines::Line;
use crate::{ParseOutput, SkippedLine};

pub(crate) struct Parser<'l> {
    lines: &'l [Line],
    max_depth: u32,
    skipped: Vec<SkippedLine>,
}

impl<'l> Parser<'l> {
    pub fn new(lines: &'l [Line], max_depth: u32) -> Self {
        Parser {
            lines,
            max_depth,
            skipped: Vec::new(),
        }
    }

    pub fn parse(mut self) -> ParseOutput {
        let sequence = self.sequence(0, self.lines.len(), Depth::with_limit(self.max_depth));
        self.skipped.sort_by_key(|s| s.line);
        ParseOutput {
            sequence,
            skipped: self.skipped,
        }
    }

    /// Parse lines `start..end` as one sequence level.
    fn sequence(&mut self, start: usize, end: usize, depth: Depth) -> ProgramSequence {
        let mut nodes = Vec::new();
        let mut index = start;
        while index < end {
            let line = &self.lines[index];
            if line.is_close() {
                self.skip(index, ErrorCode::E1003);
                index += 1;
            } else if line.opens_block() {
                let (node, next) = self.construct(index, end, depth);
                nodes.extend(node);
                index = next;
            } else {
                match header::statement_kind(&line.text) {
                    Some(kind) => nodes.push(ProgramNode::new(kind)),
                    None => self.skip(index, ErrorCode::E1001),
                }
                index += 1;
            }
        }
        ProgramSequence::new(nodes)
    }

    /// Parse the construct whose header is at `header`.
    ///
    /// Returns the node (if the construct is usable) and the index of the
    /// first line after it.
    fn construct(
        &mut self,
        header: usize,
        end: usize,
        depth: Depth,
    ) -> (Option<ProgramNode>, usize) {
        let line = &self.lines[header];
        trace!(line = line.number, text = %line.text, depth = %depth, "construct");
        match header::classify(&self.lines[header].text) {
            Header::If(condition) => {
                let (node, next) = self.if_chain(header, end, depth, condition);
                (Some(node), next)
            }
            Header::Repeat(times) => self.repeat(header, end, depth, times),
            Header::For(Some(times)) => self.repeat(header, end, depth, Some(times)),
            Header::For(None) => (None, self.skip_construct(header, end, ErrorCode::E1004)),
            Header::While(condition) => {
                let (body, next) = self.scan_block_body(header + 1, end, depth);
                let mut node = ProgramNode::new(kinds::WHILE_LOOP).with_body(body);
                if let Some(condition) = condition {
                    node = node.with_condition(condition);
                }
                (Some(node), next)
            }
            Header::Else | Header::ElseIf(_) => {
                (None, self.skip_construct(header, end, ErrorCode::E1005))
            }
            Header::Unknown => (None, self.skip_construct(header, end, ErrorCode::E1001)),
        }
    }

    fn repeat(
        &mut self,
        header: usize,
        end: usize,
        depth: Depth,
        times: Option<u32>,
    ) -> (Option<ProgramNode>, usize) {
        let (body, next) = self.scan_block_body(header + 1, end, depth);
        let mut node = ProgramNode::new(kinds::REPEAT_LOOP).with_body(body);
        if let Some(times) = times {
            node = node.with_times(times);
        }
        (Some(node), next)
    }

    /// Parse an `if` and any `else` / `else if` that follows its body.
    ///
    /// `else if` becomes an `if_else` whose else branch holds a single
    /// nested `if` node.
    fn if_chain(
        &mut self,
        header: usize,
        end: usize,
        depth: Depth,
        condition: Option<String>,
    ) -> (ProgramNode, usize) {
        let (body, mut next) = self.scan_block_body(header + 1, end, depth);
        let mut else_body = None;

        if next < end && self.lines[next].opens_block() {
            match header::classify(&self.lines[next].text) {
                Header::Else => {
                    let (branch, after) = self.scan_block_body(next + 1, end, depth);
                    else_body = Some(branch);
                    next = after;
                }
                Header::ElseIf(inner_condition) => match depth.descend() {
                    Some(inner) => {
                        let (nested, after) = ensure_sufficient_stack(|| {
                            self.if_chain(next, end, inner, inner_condition)
                        });
                        else_body = Some(ProgramSequence::new(vec![nested]));
                        next = after;
                    }
                    None => {
                        warn!(
                            line = self.lines[next].number,
                            limit = depth.limit(),
                            "else-if chain too deep"
                        );
                        next = self.skip_construct(next, end, ErrorCode::E1006);
                    }
                },
                _ => {}
            }
        }

        let kind = if else_body.is_some() {
            kinds::IF_ELSE
        } else {
            kinds::IF_ONLY
        };
        let mut node = ProgramNode::new(kind)
            .with_body(body)
            .with_else_body(else_body.unwrap_or_default());
        if let Some(condition) = condition {
            node = node.with_condition(condition);
        }
        (node, next)
    }

    /// Parse the body that starts at line `start`.
    ///
    /// Returns the body and the index just past its closing brace. A body
    /// with no closing brace runs to `end`.
    pub fn scan_block_body(
        &mut self,
        start: usize,
        end: usize,
        depth: Depth,
    ) -> (ProgramSequence, usize) {
        let close = self.find_close(start, end);
        if close.is_none() {
            self.skip(start - 1, ErrorCode::E1002);
        }
        let body_end = close.unwrap_or(end);
        let body = match depth.descend() {
            Some(inner) => ensure_sufficient_stack(|| self.sequence(start, body_end, inner)),
            None => {
                warn!(
                    line = self.lines[start - 1].number,
                    limit = depth.limit(),
                    "construct nested too deep"
                );
                self.skip(start - 1, ErrorCode::E1006);
                ProgramSequence::empty()
            }
        };
        (body, close.map_or(end, |c| c + 1))
    }

    /// Skip a whole construct, body included, reporting only its header.
    fn skip_construct(&mut self, header: usize, end: usize, code: ErrorCode) -> usize {
        self.skip(header, code);
        self.find_close(header + 1, end).map_or(end, |c| c + 1)
    }

    /// Index of the `}` closing a body that starts at `start`.
    fn find_close(&self, start: usize, end: usize) -> Option<usize> {
        let mut open = 1usize;
        for (index, line) in self.lines[start..end].iter().enumerate() {
            if line.opens_block() {
                open += 1;
            } else if line.is_close() {
                open -= 1;
                if open == 0 {
                    return Some(start + index);
                }
            }
        }
        None
    }

    fn skip(&mut self, index: usize, code: ErrorCode) {
        let line = &self.lines[index];
        trace!(line = line.number, text = %line.text, %code, "skip line");
        self.skipped.push(SkippedLine {
            line: line.number,
            text: line.text.clone(),
            code,
        });
    }
}
