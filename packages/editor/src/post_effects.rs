//! # Post-Effect System
//!
//! Mutations trigger follow-up changes that keep the document consistent.
//! They run inside the same commit as the mutation, so one undo step
//! reverts both.
//!
//! - Removing, duplicating or moving a column between rows leaves rows with a
//!   new column count, whose width shares must be redistributed
//! - Every successful change bumps the document's `updatedAt`
//!
//! Effects compare the document before and after the primary mutation
//! instead of special-casing mutation variants, so a new mutation kind gets
//! the right follow-ups without registering anything.

use crate::mutations::{Mutation, MutationError};
use crate::tree;
use std::collections::BTreeMap;
use tracing::debug;
use trellis_model::{Document, IdGenerator, NodeType};

/// Follow-up change triggered by a mutation
pub trait PostEffect: std::fmt::Debug {
    fn name(&self) -> &'static str;

    /// Adjust `doc` (already mutated) given the state it was in before
    fn apply(&self, mutation: &Mutation, before: &Document, doc: &mut Document);
}

/// Redistribute width shares in every existing row whose column count changed.
///
/// Rows that did not exist before (duplicates, inserted sections) keep the
/// widths they were created with.
#[derive(Debug)]
pub struct RebalanceColumns;

impl PostEffect for RebalanceColumns {
    fn name(&self) -> &'static str {
        "rebalance-columns"
    }

    fn apply(&self, _mutation: &Mutation, before: &Document, doc: &mut Document) {
        let old_counts = column_counts(before);
        let changed: Vec<String> = column_counts(doc)
            .into_iter()
            .filter(|(row_id, count)| old_counts.get(row_id).is_some_and(|old| old != count))
            .map(|(row_id, _)| row_id)
            .collect();

        for row_id in changed {
            for scope in doc.scopes() {
                if let Some(roots) = doc.roots_mut(&scope) {
                    if tree::rebalance_row(roots, &row_id) {
                        debug!(row_id = %row_id, "Rebalanced columns");
                        break;
                    }
                }
            }
        }
    }
}

/// Bump `updatedAt`
#[derive(Debug)]
pub struct TouchTimestamp;

impl PostEffect for TouchTimestamp {
    fn name(&self) -> &'static str {
        "touch-timestamp"
    }

    fn apply(&self, _mutation: &Mutation, _before: &Document, doc: &mut Document) {
        doc.touch();
    }
}

/// Column count of every row in the document, keyed by row id
fn column_counts(doc: &Document) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for scope in doc.scopes() {
        let Some(roots) = doc.roots(&scope) else {
            continue;
        };
        for root in roots {
            root.walk(&mut |node| {
                if node.node_type() == NodeType::Row {
                    let columns = node
                        .children()
                        .map(|c| c.iter().filter(|n| n.node_type() == NodeType::Column).count())
                        .unwrap_or(0);
                    counts.insert(node.id.clone(), columns);
                }
            });
        }
    }
    counts
}

/// Post-effect engine that applies all registered effects
#[derive(Debug)]
pub struct PostEffectEngine {
    effects: Vec<Box<dyn PostEffect>>,
}

impl PostEffectEngine {
    /// Create engine with default effects
    pub fn new() -> Self {
        Self {
            effects: vec![Box::new(RebalanceColumns), Box::new(TouchTimestamp)],
        }
    }

    /// Engine that runs no follow-ups
    pub fn empty() -> Self {
        Self { effects: Vec::new() }
    }

    pub fn with_effect(mut self, effect: Box<dyn PostEffect>) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn effect_names(&self) -> Vec<&'static str> {
        self.effects.iter().map(|e| e.name()).collect()
    }

    /// Apply a mutation with all its post-effects.
    ///
    /// `before` is the untouched state `doc` was copied from.
    pub fn apply_with_effects(
        &self,
        mutation: &Mutation,
        before: &Document,
        doc: &mut Document,
        ids: &mut IdGenerator,
    ) -> Result<Option<String>, MutationError> {
        let created = mutation.apply(doc, ids)?;
        for effect in &self.effects {
            effect.apply(mutation, before, doc);
        }
        Ok(created)
    }
}

impl Default for PostEffectEngine {
    fn default() -> Self {
        Self::new()
    }
}
