//! Forward-only navigation paths between nodes.
//!
//! Any node that follows another in pre-order, depth-first document order can
//! be reached from it with `FirstChild` and `NextSibling` steps alone. The
//! hydration layer stores such paths instead of absolute node positions.

use std::fmt;

use crate::error::NavigationError;
use crate::tree::NodeTree;

/// A single navigation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeNavigationStep {
    /// Move to the first child of the current node.
    FirstChild,
    /// Move to the next sibling of the current node.
    NextSibling,
}

impl NodeNavigationStep {
    /// Single-character form used in compressed node locations.
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::FirstChild => 'f',
            Self::NextSibling => 'n',
        }
    }

    /// Parse the single-character form.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'f' => Some(Self::FirstChild),
            'n' => Some(Self::NextSibling),
            _ => None,
        }
    }
}

impl fmt::Display for NodeNavigationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Compute the path from `start` to `finish`.
///
/// `start` must precede or equal `finish` in pre-order document order. An
/// empty path means `start == finish`.
///
/// # Errors
///
/// - [`NavigationError::NoPathFound`] if the walk reaches a node without an
///   enclosing element before connecting the two nodes.
/// - [`NavigationError::NotAFollowingSibling`] if `finish` turns out to
///   precede `start`.
pub fn navigate_between<T>(
    tree: &T,
    start: T::Node,
    finish: T::Node,
) -> Result<Vec<NodeNavigationStep>, NavigationError>
where
    T: NodeTree + ?Sized,
{
    let mut steps = Vec::new();
    collect_path(tree, start, finish, &mut steps)?;
    Ok(steps)
}

fn collect_path<T>(
    tree: &T,
    start: T::Node,
    finish: T::Node,
    steps: &mut Vec<NodeNavigationStep>,
) -> Result<(), NavigationError>
where
    T: NodeTree + ?Sized,
{
    if start == finish {
        return Ok(());
    }

    let (Some(start_parent), Some(finish_parent)) =
        (tree.parent_element(start), tree.parent_element(finish))
    else {
        return Err(NavigationError::NoPathFound {
            start: tree.describe(start),
            finish: tree.describe(finish),
        });
    };

    if start_parent == finish_parent {
        return walk_siblings(tree, start, finish, steps);
    }

    collect_path(tree, start, finish_parent, steps)?;
    steps.push(NodeNavigationStep::FirstChild);

    // `finish_parent` has at least one child: `finish` itself
    let Some(first) = tree.first_child(finish_parent) else {
        return Err(NavigationError::NoPathFound {
            start: tree.describe(finish_parent),
            finish: tree.describe(finish),
        });
    };
    collect_path(tree, first, finish, steps)
}

/// Walk `next_sibling` links from `start` until `finish`.
fn walk_siblings<T>(
    tree: &T,
    start: T::Node,
    finish: T::Node,
    steps: &mut Vec<NodeNavigationStep>,
) -> Result<(), NavigationError>
where
    T: NodeTree + ?Sized,
{
    let mut hops = 0;
    let mut current = Some(start);

    while let Some(node) = current {
        if node == finish {
            steps.extend(std::iter::repeat_n(NodeNavigationStep::NextSibling, hops));
            return Ok(());
        }
        hops += 1;
        current = tree.next_sibling(node);
    }

    tracing::debug!(
        start = %tree.describe(start),
        finish = %tree.describe(finish),
        "Sibling walk ran off the end"
    );
    Err(NavigationError::NotAFollowingSibling {
        start: tree.describe(start),
        finish: tree.describe(finish),
    })
}

/// Replay `steps` from `from`.
///
/// Returns `None` if a step has nowhere to go.
pub fn navigate_to<T>(tree: &T, from: T::Node, steps: &[NodeNavigationStep]) -> Option<T::Node>
where
    T: NodeTree + ?Sized,
{
    steps.iter().try_fold(from, |node, step| match step {
        NodeNavigationStep::FirstChild => tree.first_child(node),
        NodeNavigationStep::NextSibling => tree.next_sibling(node),
    })
}
