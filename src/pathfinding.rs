//! Shortest-path search driven by a [`KeyedHeap`]
//!
//! The frontier holds each discovered node at most once, keyed by its slot in
//! a node table. Finding a cheaper route to a frontier node re-prioritizes it
//! through [`KeyedHeap::set`], so a pop always settles a node for good and no
//! stale entries pile up behind it.
//!
//! Nodes describe the graph themselves: [`SearchNode::successors`] lists the
//! outgoing edges and [`SearchNode::is_goal`] says where to stop. Dijkstra is
//! the A* loop with a zero estimate.
//!
//! # Example
//!
//! ```rust
//! use keyed_heap::pathfinding::{dijkstra, SearchNode};
//!
//! // Towns on a toll road; the detour through "b" is cheaper than the highway
//! #[derive(Clone, PartialEq, Eq, Hash)]
//! struct Town(&'static str);
//!
//! impl SearchNode for Town {
//!     type Cost = u32;
//!
//!     fn successors(&self) -> Vec<(Self, u32)> {
//!         match self.0 {
//!             "a" => vec![(Town("b"), 2), (Town("d"), 9)],
//!             "b" => vec![(Town("c"), 3)],
//!             "c" => vec![(Town("d"), 1)],
//!             _ => vec![],
//!         }
//!     }
//!
//!     fn is_goal(&self) -> bool {
//!         self.0 == "d"
//!     }
//! }
//!
//! let (path, cost) = dijkstra(&Town("a")).unwrap();
//! assert_eq!(cost, 6);
//! assert_eq!(path.len(), 4);
//! ```

use crate::keyed_binary::KeyedHeap;
use crate::traits::MinFirst;
use log::debug;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::hash::Hash;
use std::ops::Add;

/// Edge weight and path length. `Default::default()` is the zero cost.
pub trait Cost: Ord + Copy + Add<Output = Self> + Default {}

impl<T> Cost for T where T: Ord + Copy + Add<Output = Self> + Default {}

/// A vertex that knows its outgoing edges and whether the search is done
pub trait SearchNode: Clone + Eq + Hash {
    type Cost: Cost;

    /// Neighbors paired with the weight of the edge leading to them
    fn successors(&self) -> Vec<(Self, Self::Cost)>;

    fn is_goal(&self) -> bool;
}

/// A vertex that can estimate its remaining distance to a goal
///
/// Paths returned by [`astar`] are only optimal when the estimate never
/// exceeds the true remaining cost.
pub trait AStarNode: SearchNode {
    fn heuristic(&self) -> Self::Cost;
}

/// Frontier priority. Compares on `f_score` alone.
#[derive(Debug, Clone, Copy)]
pub struct PriorityCost<C> {
    /// Cost so far plus the remaining estimate
    pub f_score: C,
    /// Cost so far
    pub g_score: C,
}

impl<C: Ord> PartialEq for PriorityCost<C> {
    fn eq(&self, other: &Self) -> bool {
        self.f_score == other.f_score
    }
}

impl<C: Ord> Eq for PriorityCost<C> {}

impl<C: Ord> PartialOrd for PriorityCost<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Ord> Ord for PriorityCost<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_score.cmp(&other.f_score)
    }
}

type NodeIndex = usize;

struct NodeEntry<N: SearchNode> {
    node: N,
    g_score: N::Cost,
    came_from: Option<NodeIndex>,
    /// Popped from the open set; its g-score is final
    closed: bool,
}

/// Bounds on how far a search may go
#[derive(Debug, Clone, Copy)]
struct Limits<C> {
    max_cost: Option<C>,
    max_nodes: Option<usize>,
    stop_at_goal: bool,
}

impl<C> Limits<C> {
    fn to_goal() -> Self {
        Limits {
            max_cost: None,
            max_nodes: None,
            stop_at_goal: true,
        }
    }

    fn exhaustive() -> Self {
        Limits {
            max_cost: None,
            max_nodes: None,
            stop_at_goal: false,
        }
    }
}

/// Open set and bookkeeping for one search
struct PathFinder<N: SearchNode> {
    nodes: Vec<NodeEntry<N>>,
    state_to_index: FxHashMap<N, NodeIndex>,
    open: KeyedHeap<NodeIndex, PriorityCost<N::Cost>, MinFirst>,
    /// Nodes in the order they were settled
    settled: Vec<NodeIndex>,
}

impl<N: SearchNode> PathFinder<N> {
    fn new() -> Self {
        PathFinder {
            nodes: Vec::new(),
            state_to_index: FxHashMap::default(),
            open: KeyedHeap::new(MinFirst),
            settled: Vec::new(),
        }
    }

    fn get_or_create_index(&mut self, node: N, g_score: N::Cost) -> (NodeIndex, bool) {
        if let Some(&index) = self.state_to_index.get(&node) {
            return (index, false);
        }
        let index = self.nodes.len();
        self.state_to_index.insert(node.clone(), index);
        self.nodes.push(NodeEntry {
            node,
            g_score,
            came_from: None,
            closed: false,
        });
        (index, true)
    }

    /// Returns the slot of the goal the search stopped at
    fn run(
        &mut self,
        start: &N,
        heuristic: impl Fn(&N) -> N::Cost,
        limits: Limits<N::Cost>,
    ) -> Option<NodeIndex> {
        let zero = N::Cost::default();
        let (start_index, _) = self.get_or_create_index(start.clone(), zero);
        self.open.set(
            start_index,
            PriorityCost {
                f_score: heuristic(start),
                g_score: zero,
            },
        );

        while let Some((current, priority)) = self.open.pop() {
            if limits.max_nodes.is_some_and(|max| self.settled.len() >= max) {
                return None;
            }
            self.settled.push(current);

            let entry = &mut self.nodes[current];
            entry.closed = true;
            if limits.stop_at_goal && entry.node.is_goal() {
                return Some(current);
            }

            let current_g = priority.g_score;
            let current_node = entry.node.clone();
            for (neighbor, edge_cost) in current_node.successors() {
                let tentative_g = current_g + edge_cost;
                if limits.max_cost.is_some_and(|max| tentative_g > max) {
                    continue;
                }

                let (neighbor_index, is_new) = self.get_or_create_index(neighbor, tentative_g);
                let neighbor_entry = &mut self.nodes[neighbor_index];
                if neighbor_entry.closed {
                    continue;
                }

                if is_new || tentative_g < neighbor_entry.g_score {
                    neighbor_entry.g_score = tentative_g;
                    neighbor_entry.came_from = Some(current);
                    let f_score = tentative_g + heuristic(&neighbor_entry.node);
                    self.open.set(
                        neighbor_index,
                        PriorityCost {
                            f_score,
                            g_score: tentative_g,
                        },
                    );
                }
            }
        }

        None
    }

    fn reconstruct_path(&self, mut current: NodeIndex) -> Vec<N> {
        let mut path = vec![self.nodes[current].node.clone()];
        while let Some(prev) = self.nodes[current].came_from {
            path.push(self.nodes[prev].node.clone());
            current = prev;
        }
        path.reverse();
        path
    }

    /// Settled nodes and their final costs, cheapest first
    fn into_settled(self) -> Vec<(N, N::Cost)> {
        let mut nodes: Vec<Option<NodeEntry<N>>> = self.nodes.into_iter().map(Some).collect();
        self.settled
            .into_iter()
            .filter_map(|i| nodes[i].take())
            .map(|entry| (entry.node, entry.g_score))
            .collect()
    }
}

fn search<N: SearchNode>(
    start: &N,
    heuristic: impl Fn(&N) -> N::Cost,
    limits: Limits<N::Cost>,
) -> Option<(Vec<N>, N::Cost)> {
    let mut finder = PathFinder::new();
    let goal = finder.run(start, heuristic, limits);
    debug!(
        "search settled {} of {} discovered nodes, goal {}",
        finder.settled.len(),
        finder.nodes.len(),
        if goal.is_some() { "found" } else { "not found" }
    );
    let goal = goal?;
    Some((finder.reconstruct_path(goal), finder.nodes[goal].g_score))
}

/// Cheapest path from `start` to the first node whose `is_goal()` holds
///
/// The path includes both ends. `None` means no goal is reachable.
pub fn dijkstra<N: SearchNode>(start: &N) -> Option<(Vec<N>, N::Cost)> {
    search(start, |_| N::Cost::default(), Limits::to_goal())
}

/// Like [`dijkstra`], but expands nodes in order of cost plus `heuristic()`
pub fn astar<N: AStarNode>(start: &N) -> Option<(Vec<N>, N::Cost)> {
    search(start, |n| n.heuristic(), Limits::to_goal())
}

/// Cheapest cost from `start` to every node it can reach
///
/// Ignores `is_goal()` and runs until the frontier is empty.
pub fn shortest_distances<N: SearchNode>(start: &N) -> FxHashMap<N, N::Cost> {
    let mut finder = PathFinder::new();
    finder.run(start, |_| N::Cost::default(), Limits::exhaustive());
    debug!("settled {} nodes", finder.settled.len());
    finder.into_settled().into_iter().collect()
}

/// Every node whose cheapest cost from `start` is at most `max_cost`,
/// in non-decreasing cost order
pub fn reachable_within<N: SearchNode>(start: &N, max_cost: N::Cost) -> Vec<(N, N::Cost)> {
    let mut finder = PathFinder::new();
    let limits = Limits {
        max_cost: Some(max_cost),
        ..Limits::exhaustive()
    };
    finder.run(start, |_| N::Cost::default(), limits);
    finder.into_settled()
}

/// Goal search with caps on path cost and on the number of settled nodes
///
/// A capped search that hits its limit before a goal returns `None`.
pub struct PathFinderBuilder<N: SearchNode> {
    start: N,
    max_cost: Option<N::Cost>,
    max_nodes: Option<usize>,
}

impl<N: SearchNode> PathFinderBuilder<N> {
    pub fn new(start: N) -> Self {
        PathFinderBuilder {
            start,
            max_cost: None,
            max_nodes: None,
        }
    }

    /// Ignore edges that would make a path cost more than `cost`
    pub fn max_cost(mut self, cost: N::Cost) -> Self {
        self.max_cost = Some(cost);
        self
    }

    /// Give up after settling `count` nodes
    pub fn max_nodes(mut self, count: usize) -> Self {
        self.max_nodes = Some(count);
        self
    }

    pub fn dijkstra(self) -> Option<(Vec<N>, N::Cost)> {
        let limits = self.limits();
        search(&self.start, |_| N::Cost::default(), limits)
    }

    pub fn astar(self) -> Option<(Vec<N>, N::Cost)>
    where
        N: AStarNode,
    {
        let limits = self.limits();
        search(&self.start, |n| n.heuristic(), limits)
    }

    fn limits(&self) -> Limits<N::Cost> {
        Limits {
            max_cost: self.max_cost,
            max_nodes: self.max_nodes,
            ..Limits::to_goal()
        }
    }
}
