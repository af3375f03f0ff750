//! Binary trees built by the generated `tree` parser.
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tree {
    Leaf(char),
    Pair(Box<Tree>, Box<Tree>),
}

impl Tree {
    pub fn pair(left: Tree, right: Tree) -> Self {
        Tree::Pair(Box::new(left), Box::new(right))
    }

    /// All trees over `a` and `b` of at most the given depth.
    pub fn enumerate(depth: usize) -> Vec<Tree> {
        let mut trees = vec![Tree::Leaf('a'), Tree::Leaf('b')];
        if depth > 0 {
            let smaller = Tree::enumerate(depth - 1);
            for left in &smaller {
                for right in &smaller {
                    trees.push(Tree::pair(left.clone(), right.clone()));
                }
            }
        }
        trees
    }
}

/// Renders the tree in the syntax `tree.rdg` accepts.
impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tree::Leaf(c) => write!(f, "{}", c),
            Tree::Pair(left, right) => write!(f, "({} {})", left, right),
        }
    }
}
