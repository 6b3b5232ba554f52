//! Implements [Monte Carlo Tree Search] (MCTS) with uniformly random playouts.
//!
//! Every iteration of [`SearchTree::run_search`] consists of four phases:
//!
//! 1. Selection: Start from the search start node and descend through known
//!    children. The first iterations of every call seed the start node by
//!    trying its columns round-robin. Everywhere else, and at the start node
//!    afterwards, the child with the best UCB score for the player to move is
//!    picked, or a random column where no child is known yet.
//! 2. Expansion: Once the descent leaves the known tree, add exactly one new
//!    node for the board it reached.
//! 3. Simulation: Play random legal columns from the new node until the game
//!    is decided.
//! 4. Backpropagation: Walk the parent links from the new node up to the
//!    start node and credit the result to each of them.
//!
//! Statistics are kept from the first player's perspective: the second player
//! looks for the lowest UCB score instead of the highest one.
//!
//! [Monte Carlo Tree Search]: https://en.wikipedia.org/wiki/Monte_Carlo_tree_search

mod config;
mod node;
mod tree;

pub use config::Config;
pub use node::{Node, NodeId};
pub use tree::{random_playout, ChildStats, SearchTree};
