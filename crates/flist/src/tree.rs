//! crates/flist/src/tree.rs
//! Recursive snapshot model shared by the snapshot builder and the reconciler.

use endpoint::Times;
use rustc_hash::FxHashMap;

/// A node in a snapshot or diff-result tree.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Tree {
    /// Nothing at this path.
    #[default]
    Absent,
    /// A regular file with its timestamps.
    Leaf(Times),
    /// A directory.
    Branch(Branch),
}

impl Tree {
    /// Shorthand for a leaf with the given access and modification times.
    #[must_use]
    pub const fn leaf(accessed: i64, modified: i64) -> Self {
        Self::Leaf(Times { accessed, modified })
    }

    /// Returns `true` for [`Tree::Absent`].
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns the branch when this node is a directory.
    #[must_use]
    pub const fn as_branch(&self) -> Option<&Branch> {
        match self {
            Self::Branch(branch) => Some(branch),
            _ => None,
        }
    }

    /// Looks up a descendant by its path segments.
    #[must_use]
    pub fn descendant<'a, I>(&self, segments: I) -> Option<&Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        segments
            .into_iter()
            .try_fold(self, |node, segment| node.as_branch()?.child(segment))
    }
}

impl From<Branch> for Tree {
    fn from(branch: Branch) -> Self {
        Self::Branch(branch)
    }
}

/// Directory node: an optional self-entry plus named children.
///
/// The self-entry holds the directory's own timestamps. In diff results its
/// presence means "act on the directory itself" (create or remove it); its
/// absence means only the children are affected. Children keep insertion
/// order until the tree is sorted; a name index keeps lookups and inserts
/// constant-time in directories with many entries.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Branch {
    own: Option<Times>,
    children: Vec<(String, Tree)>,
    index: FxHashMap<String, usize>,
}

impl Branch {
    /// Creates an empty branch with the given self-entry.
    #[must_use]
    pub fn new(own: Option<Times>) -> Self {
        Self {
            own,
            children: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Creates a branch from its parts.
    ///
    /// Later children replace earlier ones with the same name.
    #[must_use]
    pub fn from_parts<I, S>(own: Option<Times>, children: I) -> Self
    where
        I: IntoIterator<Item = (S, Tree)>,
        S: Into<String>,
    {
        let mut branch = Self::new(own);
        for (name, child) in children {
            branch.insert(name, child);
        }
        branch
    }

    /// Returns the self-entry.
    #[must_use]
    pub const fn own(&self) -> Option<Times> {
        self.own
    }

    /// Replaces the self-entry.
    pub fn set_own(&mut self, own: Option<Times>) {
        self.own = own;
    }

    /// Returns the children in their current order.
    #[must_use]
    pub fn children(&self) -> &[(String, Tree)] {
        &self.children
    }

    /// Mutable access to the child trees; names stay fixed.
    pub fn trees_mut(&mut self) -> impl Iterator<Item = &mut Tree> {
        self.children.iter_mut().map(|(_, tree)| tree)
    }

    /// Orders the direct children byte-wise by name.
    pub fn sort_by_name(&mut self) {
        self.children.sort_by(|(left, _), (right, _)| left.cmp(right));
        self.reindex();
    }

    fn reindex(&mut self) {
        for (position, (name, _)) in self.children.iter().enumerate() {
            if let Some(slot) = self.index.get_mut(name) {
                *slot = position;
            }
        }
    }

    /// Looks up a direct child by name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Tree> {
        self.index
            .get(name)
            .map(|&position| &self.children[position].1)
    }

    /// Adds a child, replacing any existing child with the same name.
    pub fn insert(&mut self, name: impl Into<String>, tree: Tree) {
        let name = name.into();
        if let Some(&position) = self.index.get(&name) {
            self.children[position].1 = tree;
        } else {
            self.index.insert(name.clone(), self.children.len());
            self.children.push((name, tree));
        }
    }

    /// Returns `true` when there is neither a self-entry nor any child.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.own.is_none() && self.children.is_empty()
    }

    /// Splits the branch into its self-entry and children.
    #[must_use]
    pub fn into_parts(self) -> (Option<Times>, Vec<(String, Tree)>) {
        (self.own, self.children)
    }
}
