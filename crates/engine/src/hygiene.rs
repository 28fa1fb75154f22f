//! Tree clean-up applied to diff results before they are shown or acted on.

use flist::{Branch, Tree};

/// Removes every [`Tree::Absent`] child at every level.
///
/// A branch left with neither a self-entry nor children collapses to
/// [`Tree::Absent`] itself, so a pruned tree never contains an empty branch.
#[must_use]
pub fn prune(tree: Tree) -> Tree {
    match tree {
        Tree::Branch(branch) => {
            let (own, children) = branch.into_parts();
            let children = children
                .into_iter()
                .map(|(name, child)| (name, prune(child)))
                .filter(|(_, child)| !child.is_absent());
            let branch = Branch::from_parts(own, children);
            if branch.is_empty() {
                Tree::Absent
            } else {
                Tree::Branch(branch)
            }
        }
        other => other,
    }
}

/// Orders children byte-wise by name at every level.
pub fn sort(tree: &mut Tree) {
    if let Tree::Branch(branch) = tree {
        branch.sort_by_name();
        for child in branch.trees_mut() {
            sort(child);
        }
    }
}

/// Prunes then sorts.
#[must_use]
pub fn tidy(tree: Tree) -> Tree {
    let mut tree = prune(tree);
    sort(&mut tree);
    tree
}

/// Strips the self-entry from every unaccounted directory that still holds
/// excluded content, so deleting unaccounted content never removes a parent
/// of something the user excluded.
///
/// Both inputs are expected to be pruned. Subtrees with no excluded
/// counterpart are kept whole. The result is pruned.
#[must_use]
pub fn protect_excluded_ancestors(unaccounted: &Tree, excluded: &Tree) -> Tree {
    prune(strip_ancestors(unaccounted, excluded))
}

fn strip_ancestors(unaccounted: &Tree, excluded: &Tree) -> Tree {
    match (unaccounted, excluded) {
        (_, Tree::Absent) | (Tree::Absent | Tree::Leaf(_), _) => unaccounted.clone(),
        (Tree::Branch(branch), _) => {
            let counterpart = excluded.as_branch();
            let children = branch.children().iter().map(|(name, child)| {
                let excluded_child = counterpart
                    .and_then(|excluded| excluded.child(name))
                    .unwrap_or(&Tree::Absent);
                (name.clone(), strip_ancestors(child, excluded_child))
            });
            Tree::Branch(Branch::from_parts(None, children))
        }
    }
}
