use std::collections::VecDeque;
use std::fmt;
use std::mem;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::config::Config;
use super::node::{Node, NodeId};
use crate::environment::{Outcome, Player};
use crate::game::Board;

/// Outcome of the selection phase.
#[derive(Debug)]
enum Selection {
    /// Descent stopped at a node whose board is already decided.
    Terminal { node: NodeId, outcome: Outcome },
    /// Descent left the known tree: `board` is one ply beyond `node`, reached
    /// by playing `column`. `count` is the parity index of `board`.
    Frontier {
        node: NodeId,
        column: u8,
        board: Board,
        count: u32,
    },
}

/// Statistics of a single child, reported for debugging and analysis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChildStats {
    /// Column leading to the child.
    pub column: u8,
    /// Playouts won by the first player.
    pub wins: u32,
    /// All playouts through the child.
    pub total: u32,
}

impl ChildStats {
    /// Fraction of playouts won by the first player.
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.total)
        }
    }
}

impl fmt::Display for ChildStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "column {} wins {} total {} win rate {:.3}",
            self.column,
            self.wins,
            self.total,
            self.win_rate()
        )
    }
}

/// Monte Carlo search tree. Nodes live in an arena and refer to each other by
/// [`NodeId`]: children are owned top-down, parent links are plain handles
/// used to walk back up during backpropagation.
pub struct SearchTree {
    nodes: Vec<Node>,
    root: NodeId,
    /// Iterations performed over the lifetime of the tree.
    total_node_count: u64,
    /// Incremented once per [`SearchTree::run_search`] call. Its parity
    /// determines the player to move at the search start node, so it has to
    /// follow the plies of the real game.
    turn_depth: u32,
    config: Config,
    rng: StdRng,
}

impl SearchTree {
    /// Creates a tree with a single unvisited root holding `root`.
    #[must_use]
    pub fn new(root: Board, config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            nodes: vec![Node::new(root, None, None)],
            root: NodeId(0),
            total_node_count: 0,
            turn_depth: 0,
            config,
            rng,
        }
    }

    /// Node representing the actual position of the game.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Number of nodes currently stored in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// The tree always holds at least the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of search iterations performed since the tree was created.
    #[must_use]
    pub const fn total_node_count(&self) -> u64 {
        self.total_node_count
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn turn_depth(&self) -> u32 {
        self.turn_depth
    }

    /// Restarts the ply counter, e.g. after a warm-up search from the root
    /// that was not a real turn of the game.
    pub fn reset_turn_depth(&mut self) {
        self.turn_depth = 0;
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Grows the subtree of `start` until `duration` passes. At least one
    /// iteration is always performed, and the clock is only checked between
    /// iterations since a playout can not be interrupted.
    pub fn run_search(&mut self, duration: Duration, start: NodeId) {
        let timer = Instant::now();
        let seeding_start = self.total_node_count;
        let start_board = self.node(start).state();
        if Player::from_parity(self.turn_depth) != start_board.to_move() {
            log::warn!(
                "turn depth {} does not match the player to move ({}) at {start:?}",
                self.turn_depth,
                start_board.to_move()
            );
        }
        loop {
            self.iterate(start, seeding_start);
            self.total_node_count += 1;
            if timer.elapsed() >= duration {
                break;
            }
        }
        self.turn_depth += 1;
        log::debug!(
            "search from {start:?}: {} iterations, {} nodes, {} visits at start, {} ms",
            self.total_node_count - seeding_start,
            self.nodes.len(),
            self.node(start).total(),
            timer.elapsed().as_millis()
        );
    }

    /// One round of select, expand, simulate and backpropagate.
    fn iterate(&mut self, start: NodeId, seeding_start: u64) {
        let (leaf, outcome) = match self.select(start, seeding_start) {
            Selection::Terminal { node, outcome } => (node, outcome),
            Selection::Frontier {
                node,
                column,
                board,
                count,
            } => {
                let leaf = self.expand(node, column, board);
                let outcome = random_playout(self.nodes[leaf.index()].state(), count, &mut self.rng);
                (leaf, outcome)
            },
        };
        self.backpropagate(start, leaf, outcome);
    }

    /// Descends from `start` until either a decided board or the frontier of
    /// the tree is reached. Only `start` itself is seeded round-robin, deeper
    /// nodes follow UCB or pick a random column when they have no children.
    fn select(&mut self, start: NodeId, seeding_start: u64) -> Selection {
        let mut node = start;
        let mut count = self.turn_depth;
        loop {
            if let Some(outcome) = self.node(node).state().game_over() {
                return Selection::Terminal { node, outcome };
            }
            let player = Player::from_parity(count);
            let iteration = self.total_node_count - seeding_start;
            let column = if node == start && iteration < self.config.seeding_threshold {
                self.seeding_column(node, iteration)
            } else if let Some(child) = self.ucb_child(node, player) {
                node = child;
                count += 1;
                continue;
            } else {
                self.random_column(node)
            };
            let board = match self.node(node).state().apply_move(column, player) {
                Ok(board) => board,
                Err(e) => unreachable!("selection picked an unplayable column: {e}"),
            };
            count += 1;
            match self.find_child(node, &board) {
                Some(child) => node = child,
                None => {
                    return Selection::Frontier {
                        node,
                        column,
                        board,
                        count,
                    }
                },
            }
        }
    }

    /// Round-robin over the columns, falling back to a random one if the
    /// scheduled column is full.
    fn seeding_column(&mut self, node: NodeId, iteration: u64) -> u8 {
        let board = self.node(node).state();
        let column = (iteration % u64::from(board.dimensions().columns())) as u8;
        if board.is_column_full(column) {
            self.random_column(node)
        } else {
            column
        }
    }

    fn random_column(&mut self, node: NodeId) -> u8 {
        let columns = self.nodes[node.index()].state().legal_columns();
        match columns.as_slice().choose(&mut self.rng) {
            Some(&column) => column,
            None => unreachable!("board of {node:?} is full but the game is not over"),
        }
    }

    /// Picks the child with the best UCB score for `player`: the maximum for
    /// the first player and the minimum for the second one, ties going to the
    /// first child in order. Returns `None` if the node has no children yet.
    ///
    /// The score of a child is `C * sqrt(2 * ln(N) / n) + q`, where `N` and `n`
    /// are visit counts of the node and the child and `q` is the child's win
    /// rate (`1 - win rate` for the second player).
    #[must_use]
    pub fn ucb_child(&self, node: NodeId, player: Player) -> Option<NodeId> {
        let parent = self.node(node);
        let ln_total = f64::from(parent.total()).ln();
        let mut best: Option<(NodeId, f64)> = None;
        for &id in parent.children() {
            let child = self.node(id);
            debug_assert!(child.visited(), "UCB on an unvisited child {id:?}");
            let explore = self.config.exploration * (2.0 * ln_total / f64::from(child.total())).sqrt();
            let exploit = match player {
                Player::First => child.win_rate(),
                Player::Second => 1.0 - child.win_rate(),
            };
            let score = explore + exploit;
            let better = best.map_or(true, |(_, best_score)| match player {
                Player::First => score > best_score,
                Player::Second => score < best_score,
            });
            if better {
                best = Some((id, score));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Column of the child chosen by [`SearchTree::ucb_child`].
    #[must_use]
    pub fn ucb_column(&self, node: NodeId, player: Player) -> Option<u8> {
        self.ucb_child(node, player)
            .and_then(|child| self.node(child).column())
    }

    /// Adds `board` as a child of `parent`. A child with an equal board is
    /// never duplicated: the existing one is returned instead.
    fn expand(&mut self, parent: NodeId, column: u8, board: Board) -> NodeId {
        if let Some(existing) = self.find_child(parent, &board) {
            return existing;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(board, Some(column), Some(parent)));
        self.nodes[parent.index()].push_child(id);
        id
    }

    /// Credits `outcome` to every node from `leaf` up to and including
    /// `start`. Only wins of the first player count as wins, ties are
    /// credited as losses.
    fn backpropagate(&mut self, start: NodeId, leaf: NodeId, outcome: Outcome) {
        let won = outcome.is_win_for(Player::First);
        let mut current = leaf;
        loop {
            let node = &mut self.nodes[current.index()];
            if won {
                node.add_win();
            } else {
                node.add_loss();
            }
            if current == start {
                break;
            }
            current = match node.parent() {
                Some(parent) => parent,
                None => panic!("{leaf:?} is not a descendant of search start {start:?}"),
            };
        }
    }

    /// Finds the child of `node` holding `board`.
    #[must_use]
    pub fn find_child(&self, node: NodeId, board: &Board) -> Option<NodeId> {
        self.node(node)
            .children()
            .iter()
            .copied()
            .find(|&child| self.node(child).state() == board)
    }

    /// Recommends a column for the player to move at the root.
    ///
    /// Immediate tactics come first: a move that wins on the spot, then a
    /// move blocking the opponent's immediate win. Otherwise the child with
    /// the best win rate is chosen (highest for the first player, lowest for
    /// the second). Returns `None` if the game is over or the root has no
    /// visited children.
    #[must_use]
    pub fn best_move(&self) -> Option<u8> {
        let board = self.node(self.root).state();
        if board.game_over().is_some() {
            return None;
        }
        let player = board.to_move();
        let columns = board.legal_columns();
        for mover in [player, !player] {
            if let Some(&column) = columns
                .iter()
                .find(|&&column| board.is_winning_move(column, mover))
            {
                return Some(column);
            }
        }
        let mut best: Option<(u8, f64)> = None;
        for &id in self.node(self.root).children() {
            let child = self.node(id);
            if !child.visited() {
                continue;
            }
            let Some(column) = child.column() else {
                continue;
            };
            let rate = child.win_rate();
            let better = best.map_or(true, |(_, best_rate)| match player {
                Player::First => rate > best_rate,
                Player::Second => rate < best_rate,
            });
            if better {
                best = Some((column, rate));
            }
        }
        best.map(|(column, _)| column)
    }

    /// Statistics of the children of `node`, in child order.
    #[must_use]
    pub fn child_stats(&self, node: NodeId) -> Vec<ChildStats> {
        self.node(node)
            .children()
            .iter()
            .filter_map(|&id| {
                let child = self.node(id);
                child.column().map(|column| ChildStats {
                    column,
                    wins: child.wins(),
                    total: child.total(),
                })
            })
            .collect()
    }

    /// Moves the root to the child of the current root holding `board` and
    /// drops everything not reachable from it. If the position was never
    /// explored, the tree restarts from a fresh root.
    pub fn advance(&mut self, board: &Board) {
        let new_root = match self.find_child(self.root, board) {
            Some(child) => child,
            None => {
                log::debug!("position {board} is not in the tree, starting a new one");
                let id = NodeId(self.nodes.len() as u32);
                self.nodes.push(Node::new(board.clone(), None, None));
                id
            },
        };
        let before = self.nodes.len();
        self.compact(new_root);
        log::debug!(
            "rebased search tree: kept {} of {before} nodes",
            self.nodes.len()
        );
    }

    /// Rebuilds the arena with the subtree of `new_root` only, in
    /// breadth-first order. The new root gets [`NodeId`] 0 and no parent.
    fn compact(&mut self, new_root: NodeId) {
        let mut old: Vec<Option<Node>> = mem::take(&mut self.nodes).into_iter().map(Some).collect();
        let mut nodes = Vec::new();
        let mut queue = VecDeque::from([(new_root, None)]);
        let mut next_id = 1;
        while let Some((old_id, parent)) = queue.pop_front() {
            let Some(mut node) = old[old_id.index()].take() else {
                unreachable!("{old_id:?} is reachable through two parents");
            };
            let id = NodeId(nodes.len() as u32);
            let mut children = Vec::with_capacity(node.children().len());
            for &child in node.children() {
                children.push(NodeId(next_id));
                next_id += 1;
                queue.push_back((child, Some(id)));
            }
            node.replace_children(children);
            node.set_parent(parent);
            nodes.push(node);
        }
        self.nodes = nodes;
        self.root = NodeId(0);
    }
}

impl fmt::Debug for SearchTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchTree")
            .field("nodes", &self.nodes.len())
            .field("root", &self.root)
            .field("total_node_count", &self.total_node_count)
            .field("turn_depth", &self.turn_depth)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Plays uniformly random legal columns from `board` until the game is
/// decided. `count` is the parity index of `board`, i.e. the first move is
/// made by [`Player::from_parity`] of it.
pub fn random_playout<R: Rng + ?Sized>(board: &Board, count: u32, rng: &mut R) -> Outcome {
    if let Some(outcome) = board.game_over() {
        return outcome;
    }
    let mut board = board.clone();
    let mut count = count;
    loop {
        let player = Player::from_parity(count);
        let columns = board.legal_columns();
        let Some(&column) = columns.as_slice().choose(rng) else {
            unreachable!("no legal columns on an undecided board");
        };
        if board.is_winning_move(column, player) {
            return Outcome::Win(player);
        }
        if let Err(e) = board.play(column, player) {
            unreachable!("playout picked an unplayable column: {e}");
        }
        if board.is_full() {
            return Outcome::Tie;
        }
        count += 1;
    }
}
