//! Separation-of-duty checker
//!
//! Decides whether adding a candidate role to an existing role set
//! would put `cardinality` or more members of any SD set in effect for
//! one user or session. Membership counts through the hierarchy: a role
//! satisfies a set both directly and via any set member it inherits.

use crate::error::{RbacError, Result};
use crate::types::SdSet;
use rolegate_hierarchy::RoleGraph;
use std::collections::HashSet;
use std::sync::Arc;

/// Checker shared between the activation engine (dynamic sets) and the
/// assignment gate (static sets). Stateless apart from its graph handle.
#[derive(Clone)]
pub struct SodChecker {
    graph: Arc<RoleGraph>,
}

impl SodChecker {
    pub fn new(graph: Arc<RoleGraph>) -> Self {
        Self { graph }
    }

    /// Check the candidate role against the existing set under every
    /// supplied SD set.
    ///
    /// `existing` is the already-assigned (static) or already-active
    /// (dynamic) role names. The closure is `existing ∪ {candidate}`
    /// expanded through inherited membership; any set whose member
    /// intersection with the closure reaches its cardinality rejects
    /// the candidate.
    pub fn check<'a, I>(&self, existing: I, candidate: &'a str, sd_sets: &[SdSet]) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut roles: Vec<&str> = existing.into_iter().collect();
        roles.push(candidate);
        let closure = self.graph.ascendants_of_set(roles)?;

        for set in sd_sets {
            let conflicting: HashSet<&String> =
                set.members.intersection(&closure).collect();
            if conflicting.len() >= set.cardinality {
                let mut conflicting: Vec<String> =
                    conflicting.into_iter().cloned().collect();
                conflicting.sort();
                tracing::debug!(
                    sd_set = %set.name,
                    cardinality = set.cardinality,
                    ?conflicting,
                    candidate,
                    "separation-of-duty violation"
                );
                return Err(RbacError::SodViolation {
                    sd_set: set.name.clone(),
                    cardinality: set.cardinality,
                    conflicting,
                });
            }
        }
        Ok(())
    }
}
