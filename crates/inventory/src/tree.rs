//! Parent-linked trees (storage places, categories).
//!
//! Nodes never hold references to each other: a node only stores the id of its
//! parent, and every walk goes through an id lookup with a visited set. A cycle
//! in stored data therefore surfaces as [`DomainError::CircleDetected`] instead
//! of an endless loop.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use partuniverse_core::{DomainError, DomainResult, Entity};

/// A record that may be nested under another record of the same kind.
pub trait TreeNode: Entity + Clone {
    fn name(&self) -> &str;

    fn parent(&self) -> Option<Self::Id>;
}

/// Ids from `start` up to its root, `start` first.
///
/// `lookup` resolves an id to its node; a dangling parent link fails with
/// `ReferenceNotFound`.
pub fn ancestor_chain<N, F>(start: N::Id, mut lookup: F) -> DomainResult<Vec<N::Id>>
where
    N: TreeNode,
    N::Id: Into<Uuid>,
    F: FnMut(&N::Id) -> DomainResult<Option<N>>,
{
    let mut chain = Vec::new();
    let mut visited = HashSet::new();
    let mut next = Some(start);

    while let Some(id) = next {
        if !visited.insert(id) {
            return Err(DomainError::CircleDetected(id.into()));
        }
        chain.push(id);

        let node = lookup(&id)?.ok_or_else(|| DomainError::reference_not_found(N::KIND, id))?;
        next = node.parent();
    }

    Ok(chain)
}

/// Names from the root down to `start`, joined by `delimiter`.
pub fn qualified_name<N, F>(start: N::Id, delimiter: &str, mut lookup: F) -> DomainResult<String>
where
    N: TreeNode,
    N::Id: Into<Uuid>,
    F: FnMut(&N::Id) -> DomainResult<Option<N>>,
{
    let mut names = Vec::new();
    let chain = ancestor_chain::<N, _>(start, |id| {
        let node = lookup(id)?;
        if let Some(n) = &node {
            names.push(n.name().to_string());
        }
        Ok(node)
    })?;
    debug_assert_eq!(chain.len(), names.len());

    names.reverse();
    Ok(names.join(delimiter))
}

/// Check a node's parent link before it is written.
///
/// For a node that already exists the proposed parent's ancestry is walked with
/// `candidate` standing in for its stored version, so re-parenting a node under
/// itself or one of its descendants is caught. A cycle is reported as a field
/// error on `parent`. New nodes cannot be anyone's ancestor yet; only their
/// parent's existence is checked.
pub fn validate_parent<N, F>(candidate: &N, exists: bool, mut lookup: F) -> DomainResult<()>
where
    N: TreeNode,
    N::Id: Into<Uuid>,
    F: FnMut(&N::Id) -> DomainResult<Option<N>>,
{
    let Some(parent) = candidate.parent() else {
        return Ok(());
    };

    if !exists {
        return match lookup(&parent)? {
            Some(_) => Ok(()),
            None => Err(DomainError::reference_not_found(N::KIND, parent)),
        };
    }

    let overlaid = |id: &N::Id| {
        if id == candidate.id() {
            Ok(Some(candidate.clone()))
        } else {
            lookup(id)
        }
    };

    match ancestor_chain::<N, _>(parent, overlaid) {
        Ok(_) => Ok(()),
        Err(DomainError::CircleDetected(_)) => Err(DomainError::field(
            "parent",
            format!("the {} cannot be one of its own ancestors", N::KIND),
        )),
        Err(e) => Err(e),
    }
}

/// Id-indexed arena of nodes of one kind.
#[derive(Debug, Clone)]
pub struct TreeArena<N: TreeNode> {
    nodes: HashMap<N::Id, N>,
}

impl<N> TreeArena<N>
where
    N: TreeNode,
    N::Id: Into<Uuid>,
{
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }

    pub fn insert(&mut self, node: N) -> Option<N> {
        self.nodes.insert(*node.id(), node)
    }

    pub fn get(&self, id: &N::Id) -> Option<&N> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ancestor_chain(&self, id: N::Id) -> DomainResult<Vec<N::Id>> {
        ancestor_chain::<N, _>(id, |id| Ok(self.nodes.get(id).cloned()))
    }

    /// Fails on the first node whose ancestry loops or dangles.
    pub fn ensure_acyclic(&self) -> DomainResult<()> {
        let mut ids: Vec<_> = self.nodes.keys().copied().collect();
        ids.sort();
        for id in ids {
            self.ancestor_chain(id)?;
        }
        Ok(())
    }
}

impl<N> Default for TreeArena<N>
where
    N: TreeNode,
    N::Id: Into<Uuid>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N> FromIterator<N> for TreeArena<N>
where
    N: TreeNode,
    N::Id: Into<Uuid>,
{
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        let mut arena = Self::new();
        for node in iter {
            arena.insert(node);
        }
        arena
    }
}
