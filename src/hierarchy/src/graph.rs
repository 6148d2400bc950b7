//! Role inheritance graph
//!
//! Maintains the DAG of "inherits-from" relations between roles and
//! answers the ascendant/descendant closure queries used by inheritance
//! and separation-of-duty evaluation. Mutations preserve the graph
//! invariants: no cycles, no duplicate relations, and no mutation may
//! strand a previously-connected role without any relation.

use crate::error::{HierarchyError, Result};
use dashmap::DashMap;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::RwLock;

/// Adjacency storage guarded by the graph lock.
///
/// Edges point child -> parent: the child role inherits the parent's
/// permissions. Ascendant queries walk outgoing edges, descendant
/// queries walk incoming edges.
#[derive(Debug, Default)]
struct Inner {
    graph: DiGraph<String, ()>,
    indices: HashMap<String, NodeIndex>,
}

impl Inner {
    fn index(&self, role: &str) -> Result<NodeIndex> {
        self.indices
            .get(role)
            .copied()
            .ok_or_else(|| HierarchyError::UnknownRole(role.to_string()))
    }

    /// Reachability from `start` following `dir`, excluding `start` itself.
    fn reach(&self, start: NodeIndex, dir: Direction) -> HashSet<String> {
        let mut seen: HashSet<NodeIndex> = HashSet::new();
        let mut queue: VecDeque<NodeIndex> = VecDeque::new();
        queue.push_back(start);

        while let Some(node) = queue.pop_front() {
            for next in self.graph.neighbors_directed(node, dir) {
                if next != start && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        seen.into_iter().map(|n| self.graph[n].clone()).collect()
    }

    fn degree(&self, node: NodeIndex) -> usize {
        self.graph.neighbors_directed(node, Direction::Outgoing).count()
            + self.graph.neighbors_directed(node, Direction::Incoming).count()
    }
}

/// Thread-safe role hierarchy graph.
///
/// Reads (`ascendants`, `descendants`, closure queries) proceed
/// concurrently; mutations take the write lock and publish a fully
/// updated edge set before any reader can observe it. Closure results
/// are memoized and the memo is dropped on every successful mutation.
///
/// One instance holds one role type's hierarchy; RBAC roles and admin
/// roles get independent instances.
#[derive(Debug, Default)]
pub struct RoleGraph {
    inner: RwLock<Inner>,
    ascendant_cache: DashMap<String, HashSet<String>>,
    descendant_cache: DashMap<String, HashSet<String>>,
}

impl RoleGraph {
    /// Create an empty hierarchy.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|e| HierarchyError::Lock(e.to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|e| HierarchyError::Lock(e.to_string()))
    }

    fn invalidate(&self) {
        self.ascendant_cache.clear();
        self.descendant_cache.clear();
    }

    /// Insert an isolated role node. No-op if the role is already present.
    pub fn add_role(&self, name: &str) -> Result<()> {
        let mut inner = self.write()?;
        if !inner.indices.contains_key(name) {
            let idx = inner.graph.add_node(name.to_string());
            inner.indices.insert(name.to_string(), idx);
            tracing::debug!(role = name, "hierarchy node added");
        }
        Ok(())
    }

    /// Add an inheritance relation: `child` inherits `parent`'s permissions.
    ///
    /// Fails if either role is unknown, if the relation already exists,
    /// or if the relation would create a cycle (i.e. `parent` already
    /// inherits from `child`, directly or transitively).
    pub fn add_inheritance(&self, parent: &str, child: &str) -> Result<()> {
        let mut inner = self.write()?;
        let parent_idx = inner.index(parent)?;
        let child_idx = inner.index(child)?;

        if parent_idx == child_idx {
            return Err(HierarchyError::CycleDetected {
                parent: parent.to_string(),
                child: child.to_string(),
            });
        }
        if inner.graph.find_edge(child_idx, parent_idx).is_some() {
            return Err(HierarchyError::EdgeExists {
                parent: parent.to_string(),
                child: child.to_string(),
            });
        }
        // Cycle check before commit: the parent must not already be a
        // descendant of the child.
        if inner.reach(child_idx, Direction::Incoming).contains(parent) {
            return Err(HierarchyError::CycleDetected {
                parent: parent.to_string(),
                child: child.to_string(),
            });
        }

        inner.graph.add_edge(child_idx, parent_idx, ());
        // Invalidate while still holding the write lock: a reader can
        // only publish a cache entry under the read lock, so its insert
        // is ordered entirely before or after this clear, never between
        // the edge commit and it.
        self.invalidate();
        drop(inner);
        tracing::debug!(parent, child, "inheritance relation added");
        Ok(())
    }

    /// Remove an inheritance relation.
    ///
    /// Fails if the relation does not exist, or if removing it would
    /// leave either role with no remaining relation at all (a connected
    /// role may not be stranded by edge removal).
    pub fn remove_inheritance(&self, parent: &str, child: &str) -> Result<()> {
        let mut inner = self.write()?;
        let parent_idx = inner.index(parent)?;
        let child_idx = inner.index(child)?;

        let edge = inner.graph.find_edge(child_idx, parent_idx).ok_or_else(|| {
            HierarchyError::EdgeNotFound {
                parent: parent.to_string(),
                child: child.to_string(),
            }
        })?;

        if inner.degree(child_idx) == 1 {
            return Err(HierarchyError::LastRelation(child.to_string()));
        }
        if inner.degree(parent_idx) == 1 {
            return Err(HierarchyError::LastRelation(parent.to_string()));
        }

        inner.graph.remove_edge(edge);
        self.invalidate();
        drop(inner);
        tracing::debug!(parent, child, "inheritance relation removed");
        Ok(())
    }

    /// All roles `role` transitively inherits from (its senior closure
    /// upward along the inherits-from direction). Excludes `role` itself.
    pub fn ascendants(&self, role: &str) -> Result<HashSet<String>> {
        if let Some(cached) = self.ascendant_cache.get(role) {
            return Ok(cached.clone());
        }
        let inner = self.read()?;
        let idx = inner.index(role)?;
        let set = inner.reach(idx, Direction::Outgoing);
        // Publish before releasing the read lock; see add_inheritance.
        self.ascendant_cache.insert(role.to_string(), set.clone());
        drop(inner);
        Ok(set)
    }

    /// All roles that transitively inherit from `role`. Excludes `role`.
    pub fn descendants(&self, role: &str) -> Result<HashSet<String>> {
        if let Some(cached) = self.descendant_cache.get(role) {
            return Ok(cached.clone());
        }
        let inner = self.read()?;
        let idx = inner.index(role)?;
        let set = inner.reach(idx, Direction::Incoming);
        self.descendant_cache.insert(role.to_string(), set.clone());
        drop(inner);
        Ok(set)
    }

    /// Inherited closure of a role set: the set itself plus every role
    /// any member transitively inherits from. Role names absent from the
    /// graph contribute only themselves.
    pub fn ascendants_of_set<'a, I>(&self, roles: I) -> Result<HashSet<String>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut closure = HashSet::new();
        for role in roles {
            closure.insert(role.to_string());
            if self.contains(role)? {
                closure.extend(self.ascendants(role)?);
            }
        }
        Ok(closure)
    }

    /// Downward closure of a role set: the set itself plus every role
    /// that transitively inherits from any member. Role names absent
    /// from the graph contribute only themselves.
    pub fn descendants_of_set<'a, I>(&self, roles: I) -> Result<HashSet<String>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut closure = HashSet::new();
        for role in roles {
            closure.insert(role.to_string());
            if self.contains(role)? {
                closure.extend(self.descendants(role)?);
            }
        }
        Ok(closure)
    }

    /// Direct parents of a role (roles it inherits from directly).
    pub fn parents(&self, role: &str) -> Result<HashSet<String>> {
        let inner = self.read()?;
        let idx = inner.index(role)?;
        Ok(inner
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|n| inner.graph[n].clone())
            .collect())
    }

    /// Direct children of a role (roles that inherit from it directly).
    pub fn children(&self, role: &str) -> Result<HashSet<String>> {
        let inner = self.read()?;
        let idx = inner.index(role)?;
        Ok(inner
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .map(|n| inner.graph[n].clone())
            .collect())
    }

    /// Whether the role is a node in this graph.
    pub fn contains(&self, role: &str) -> Result<bool> {
        Ok(self.read()?.indices.contains_key(role))
    }

    /// All role names currently in the graph.
    pub fn roles(&self) -> Result<Vec<String>> {
        Ok(self.read()?.indices.keys().cloned().collect())
    }

    /// Number of roles in the graph.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.indices.len())
    }

    /// Whether the graph has no roles.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.indices.is_empty())
    }

    /// Drop all nodes and edges. Used by hierarchy reload.
    pub fn clear(&self) -> Result<()> {
        let mut inner = self.write()?;
        inner.graph.clear();
        inner.indices.clear();
        self.invalidate();
        drop(inner);
        Ok(())
    }
}
