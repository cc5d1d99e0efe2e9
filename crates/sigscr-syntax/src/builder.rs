use crate::ast::{ConditionalBlock, ConditionalPhase, NodeId, NodeKind, Script};
use crate::operator::OperatorToken;
use crate::parser::ParseError;

/// Which punctuation closed the node at the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Closer {
    Bracket,
    Brace,
}

impl Closer {
    fn symbol(self) -> &'static str {
        match self {
            Self::Bracket => ")",
            Self::Brace => "}",
        }
    }
}

/// Builds one script tree. `cursor` is the node open for insertion; closing
/// a node moves it back up through the parent links.
pub(crate) struct ScriptBuilder {
    script: Script,
    cursor: NodeId,
    reading_name: bool,
    max_depth: Option<usize>,
}

impl ScriptBuilder {
    pub(crate) fn new(line: usize, max_depth: Option<usize>) -> Self {
        let script = Script::new(line);
        let cursor = script.root();
        Self {
            script,
            cursor,
            reading_name: true,
            max_depth,
        }
    }

    pub(crate) fn name(&self) -> &str {
        self.script.name()
    }

    pub(crate) fn reading_name(&self) -> bool {
        self.reading_name
    }

    pub(crate) fn push_name(&mut self, part: &str) {
        self.script.push_name(part);
    }

    pub(crate) fn end_name(&mut self) {
        self.reading_name = false;
    }

    /// Hands the tree over once every block opened inside it is closed.
    pub(crate) fn finish(self, line: usize) -> Result<Script, ParseError> {
        if self.cursor != self.script.root() {
            return Err(ParseError::UnclosedScript {
                script: self.script.name().to_string(),
                open: self.script.kind(self.cursor).label(),
                line,
            });
        }
        Ok(self.script)
    }

    pub(crate) fn add_value(&mut self, text: String, line: usize) -> Result<(), ParseError> {
        self.add_leaf(NodeKind::Value { text }, line)
    }

    pub(crate) fn add_operator(
        &mut self,
        operator: OperatorToken,
        line: usize,
    ) -> Result<(), ParseError> {
        self.add_leaf(NodeKind::Operator(operator), line)
    }

    fn add_leaf(&mut self, leaf: NodeKind, line: usize) -> Result<(), ParseError> {
        let target = self.expression_target(line)?;
        self.script.push(target, leaf, line);
        self.cursor = target;
        Ok(())
    }

    /// `{`
    pub(crate) fn open_block(&mut self, line: usize) -> Result<(), ParseError> {
        match self.script.kind(self.cursor) {
            NodeKind::Statement | NodeKind::Enclosure => {
                return Err(ParseError::MisplacedBlock {
                    construct: "{",
                    line,
                })
            }
            NodeKind::Conditional(_) => self.ensure_body_slot(line)?,
            _ => {}
        }
        self.cursor = self.open_child(self.cursor, NodeKind::Block, line)?;
        Ok(())
    }

    /// `(`
    pub(crate) fn open_enclosure(&mut self, line: usize) -> Result<(), ParseError> {
        let awaiting_condition = self
            .script
            .conditional(self.cursor)
            .is_some_and(|conditional| conditional.phase == ConditionalPhase::AwaitingCondition);
        let parent = if awaiting_condition {
            self.cursor
        } else {
            self.expression_target(line)?
        };
        self.cursor = self.open_child(parent, NodeKind::Enclosure, line)?;
        Ok(())
    }

    /// `IF`
    pub(crate) fn open_conditional(&mut self, line: usize) -> Result<(), ParseError> {
        let is_alternate_condition = match self.script.kind(self.cursor) {
            NodeKind::Statement | NodeKind::Enclosure => {
                return Err(ParseError::MisplacedBlock {
                    construct: "IF",
                    line,
                })
            }
            NodeKind::Conditional(conditional) => {
                let awaiting_alternate = conditional.phase == ConditionalPhase::AwaitingAlternate;
                self.ensure_body_slot(line)?;
                awaiting_alternate
            }
            _ => false,
        };
        let conditional = NodeKind::Conditional(ConditionalBlock::new(is_alternate_condition));
        self.cursor = self.open_child(self.cursor, conditional, line)?;
        Ok(())
    }

    /// `;`
    pub(crate) fn end_statement(&mut self, line: usize) -> Result<(), ParseError> {
        match self.script.kind(self.cursor) {
            NodeKind::Statement => self.complete(self.cursor, line),
            NodeKind::Enclosure => Err(ParseError::MismatchedClose {
                expected: ")",
                found: ";",
                line,
            }),
            NodeKind::Conditional(_) => {
                self.ensure_body_slot(line)?;
                let empty = self.open_child(self.cursor, NodeKind::Statement, line)?;
                self.complete(empty, line)
            }
            // an empty statement between statements or blocks
            _ => Ok(()),
        }
    }

    /// `)` or `}`
    pub(crate) fn close(&mut self, closer: Closer, line: usize) -> Result<(), ParseError> {
        let expected = match self.script.kind(self.cursor) {
            NodeKind::Enclosure => Closer::Bracket,
            NodeKind::Block => Closer::Brace,
            NodeKind::Script => {
                return Err(ParseError::UnmatchedClose {
                    found: closer.symbol(),
                    line,
                })
            }
            NodeKind::Statement => {
                return Err(ParseError::MismatchedClose {
                    expected: ";",
                    found: closer.symbol(),
                    line,
                })
            }
            NodeKind::Conditional(conditional) => {
                let wanted = if conditional.has_condition() { "statement" } else { "(" };
                return Err(ParseError::MismatchedClose {
                    expected: wanted,
                    found: closer.symbol(),
                    line,
                });
            }
            NodeKind::Value { .. } | NodeKind::Operator(_) => {
                return Err(ParseError::Unexpected {
                    found: closer.symbol().to_string(),
                    line,
                })
            }
        };
        if expected != closer {
            return Err(ParseError::MismatchedClose {
                expected: expected.symbol(),
                found: closer.symbol(),
                line,
            });
        }
        self.complete(self.cursor, line)
    }

    /// `ELSE`: binds to the deepest unresolved conditional reachable from the
    /// last child of the attachment point and opens its alternate slot.
    pub(crate) fn open_alternate(&mut self, line: usize) -> Result<(), ParseError> {
        // `IF (A) X = 1 ELSE ...` ends the body statement implicitly
        if matches!(self.script.kind(self.cursor), NodeKind::Statement) {
            let owner = self.script.parent(self.cursor);
            if owner.is_some_and(|owner| self.script.kind(owner).is_conditional()) {
                self.complete(self.cursor, line)?;
            }
        }

        let attachment = self.cursor;
        if !matches!(self.script.kind(attachment), NodeKind::Script | NodeKind::Block) {
            return Err(ParseError::ElseWithoutIf { line });
        }
        let target = self
            .script
            .children(attachment)
            .last()
            .and_then(|last| self.deepest_unresolved(*last))
            .ok_or(ParseError::ElseWithoutIf { line })?;

        self.script.node_mut(attachment).alternate_return = true;
        if let Some(conditional) = self.script.conditional_mut(target) {
            conditional.phase = ConditionalPhase::AwaitingAlternate;
        }
        self.cursor = target;
        Ok(())
    }

    fn deepest_unresolved(&self, start: NodeId) -> Option<NodeId> {
        let mut candidate = None;
        let mut node = start;
        while let Some(conditional) = self.script.conditional(node) {
            let next = match conditional.phase {
                ConditionalPhase::BodyComplete => {
                    candidate = Some(node);
                    self.script.body(node)
                }
                // only an `ELSE IF` link can still take another `ELSE`
                ConditionalPhase::Complete => self.script.alternate(node),
                _ => None,
            };
            match next {
                Some(next) => node = next,
                None => break,
            }
        }
        candidate
    }

    /// Node that receives expression leaves, opening a statement when the
    /// cursor sits on a container.
    fn expression_target(&mut self, line: usize) -> Result<NodeId, ParseError> {
        match self.script.kind(self.cursor) {
            NodeKind::Statement | NodeKind::Enclosure => Ok(self.cursor),
            NodeKind::Script | NodeKind::Block => {
                self.open_child(self.cursor, NodeKind::Statement, line)
            }
            NodeKind::Conditional(_) => {
                self.ensure_body_slot(line)?;
                self.open_child(self.cursor, NodeKind::Statement, line)
            }
            NodeKind::Value { .. } | NodeKind::Operator(_) => Err(ParseError::Unexpected {
                found: "token".to_string(),
                line,
            }),
        }
    }

    /// The conditional at the cursor must be waiting for its body or alternate.
    fn ensure_body_slot(&self, line: usize) -> Result<(), ParseError> {
        match self.phase(self.cursor) {
            Some(ConditionalPhase::AwaitingBody | ConditionalPhase::AwaitingAlternate) => Ok(()),
            Some(ConditionalPhase::AwaitingCondition) => Err(ParseError::MissingCondition { line }),
            _ => Err(ParseError::Unexpected {
                found: "statement".to_string(),
                line,
            }),
        }
    }

    fn open_child(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        line: usize,
    ) -> Result<NodeId, ParseError> {
        let id = self.script.push(parent, kind, line);
        if let Some(max_depth) = self.max_depth {
            let depth = self.script.depth(id);
            if depth > max_depth {
                return Err(ParseError::NestingTooDeep { depth, line });
            }
        }
        Ok(id)
    }

    /// Closes `id` one level. Completing a child of a conditional advances the
    /// conditional instead of simply returning to it.
    fn complete(&mut self, id: NodeId, line: usize) -> Result<(), ParseError> {
        let Some(parent) = self.script.parent(id) else {
            return Err(ParseError::Unexpected {
                found: "end of script".to_string(),
                line,
            });
        };
        self.script.node_mut(id).current = None;
        self.script.node_mut(parent).current = None;

        let Some(phase) = self.phase(parent) else {
            self.cursor = parent;
            return Ok(());
        };
        match phase {
            ConditionalPhase::AwaitingCondition => {
                self.set_phase(parent, ConditionalPhase::AwaitingBody);
                self.cursor = parent;
                Ok(())
            }
            ConditionalPhase::AwaitingBody => {
                self.set_phase(parent, ConditionalPhase::BodyComplete);
                self.ascend(parent, false, line)
            }
            ConditionalPhase::AwaitingAlternate => {
                self.set_phase(parent, ConditionalPhase::Complete);
                self.ascend(parent, true, line)
            }
            ConditionalPhase::BodyComplete | ConditionalPhase::Complete => {
                Err(ParseError::Unexpected {
                    found: "statement".to_string(),
                    line,
                })
            }
        }
    }

    /// After `conditional` finished its body or alternate, propagate through
    /// enclosing conditionals it fills a slot of, then park the cursor on the
    /// first container above the chain.
    fn ascend(
        &mut self,
        conditional: NodeId,
        mut alternate_done: bool,
        line: usize,
    ) -> Result<(), ParseError> {
        let mut node = conditional;
        let container = loop {
            let Some(parent) = self.script.parent(node) else {
                return Err(ParseError::MissingAlternateReturn { line });
            };
            let Some(phase) = self.phase(parent) else {
                break parent;
            };
            match phase {
                ConditionalPhase::AwaitingBody => {
                    self.set_phase(parent, ConditionalPhase::BodyComplete)
                }
                ConditionalPhase::AwaitingAlternate => {
                    self.set_phase(parent, ConditionalPhase::Complete);
                    alternate_done = true;
                }
                // slot already filled, e.g. a brace-less body that took the `ELSE`
                _ => {}
            }
            self.script.node_mut(parent).current = None;
            node = parent;
        };

        self.cursor = if alternate_done {
            self.find_alternate_return(conditional, line)?
        } else {
            container
        };
        Ok(())
    }

    fn find_alternate_return(&mut self, from: NodeId, line: usize) -> Result<NodeId, ParseError> {
        let mut cursor = self.script.parent(from);
        while let Some(id) = cursor {
            if self.script.node(id).alternate_return {
                self.script.node_mut(id).alternate_return = false;
                return Ok(id);
            }
            cursor = self.script.parent(id);
        }
        Err(ParseError::MissingAlternateReturn { line })
    }

    fn phase(&self, id: NodeId) -> Option<ConditionalPhase> {
        self.script.conditional(id).map(|conditional| conditional.phase)
    }

    fn set_phase(&mut self, id: NodeId, phase: ConditionalPhase) {
        if let Some(conditional) = self.script.conditional_mut(id) {
            conditional.phase = phase;
        }
    }
}

#[cfg(test)]
#[path = "builder_test.rs"]
mod tests;
