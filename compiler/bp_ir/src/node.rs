//! Program nodes and sequences.
//!
//! A [`ProgramSequence`] is one level of sequential statements; control
//! constructs carry their nested levels in [`ProgramNode::body`] and
//! [`ProgramNode::else_body`]. An empty nested level and an absent one are
//! the same value: both producers and all comparisons see an empty sequence.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Leaf expression in a construct's condition slot, reduced to its kind.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    pub kind: String,
}

impl Condition {
    pub fn new(kind: impl Into<String>) -> Self {
        Condition { kind: kind.into() }
    }
}

/// One statement in canonical form.
///
/// Fields are private: a node is assembled with the `with_*` builders by the
/// producer that creates it and read through accessors afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramNode {
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    condition: Option<Condition>,
    #[serde(default, skip_serializing_if = "ProgramSequence::is_empty")]
    body: ProgramSequence,
    #[serde(default, skip_serializing_if = "ProgramSequence::is_empty")]
    else_body: ProgramSequence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    times: Option<u32>,
}

impl ProgramNode {
    /// A plain statement of the given kind.
    pub fn new(kind: impl Into<String>) -> Self {
        ProgramNode {
            kind: kind.into(),
            condition: None,
            body: ProgramSequence::empty(),
            else_body: ProgramSequence::empty(),
            times: None,
        }
    }

    #[must_use]
    pub fn with_condition(mut self, kind: impl Into<String>) -> Self {
        self.condition = Some(Condition::new(kind));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: ProgramSequence) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub fn with_else_body(mut self, else_body: ProgramSequence) -> Self {
        self.else_body = else_body;
        self
    }

    #[must_use]
    pub fn with_times(mut self, times: u32) -> Self {
        self.times = Some(times);
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    /// Kind of the condition leaf, if any.
    pub fn condition_kind(&self) -> Option<&str> {
        self.condition.as_ref().map(|c| c.kind.as_str())
    }

    pub fn body(&self) -> &ProgramSequence {
        &self.body
    }

    pub fn else_body(&self) -> &ProgramSequence {
        &self.else_body
    }

    pub fn times(&self) -> Option<u32> {
        self.times
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.body.node_count() + self.else_body.node_count()
    }
}

/// Ordered, order-significant list of statements at one nesting level.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgramSequence {
    nodes: Vec<ProgramNode>,
}

impl ProgramSequence {
    /// The "nothing written yet" program.
    pub fn empty() -> Self {
        ProgramSequence { nodes: Vec::new() }
    }

    pub fn new(nodes: Vec<ProgramNode>) -> Self {
        ProgramSequence { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ProgramNode> {
        self.nodes.get(index)
    }

    pub fn nodes(&self) -> &[ProgramNode] {
        &self.nodes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProgramNode> {
        self.nodes.iter()
    }

    /// Top-level kinds in order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(ProgramNode::kind)
    }

    /// Total number of nodes at every nesting level.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().map(ProgramNode::node_count).sum()
    }
}

impl From<Vec<ProgramNode>> for ProgramSequence {
    fn from(nodes: Vec<ProgramNode>) -> Self {
        ProgramSequence::new(nodes)
    }
}

impl FromIterator<ProgramNode> for ProgramSequence {
    fn from_iter<I: IntoIterator<Item = ProgramNode>>(iter: I) -> Self {
        ProgramSequence::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ProgramSequence {
    type Item = &'a ProgramNode;
    type IntoIter = std::slice::Iter<'a, ProgramNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl fmt::Display for ProgramNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.kind)?;
        if let Some(times) = self.times {
            write!(f, "x{times}")?;
        }
        if let Some(cond) = &self.condition {
            write!(f, "({})", cond.kind)?;
        }
        if !self.body.is_empty() {
            write!(f, " {{ {} }}", self.body)?;
        }
        if !self.else_body.is_empty() {
            write!(f, " else {{ {} }}", self.else_body)?;
        }
        Ok(())
    }
}

/// Compact one-line form, e.g. `move_forward, repeat_loopx3 { turn_left }`.
impl fmt::Display for ProgramSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{node}")?;
        }
        Ok(())
    }
}
