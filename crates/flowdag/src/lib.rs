//! flowdag - directed graphs of prototype flows.
//!
//! The core is [`graph::Graph`]: a node/edge store that rejects dangling
//! edges, self-loops and duplicate edges, detects and removes cycles with an
//! explicit-stack DFS, and can emit a dense adjacency matrix. Around it sit
//! the collaborators that feed and consume it:
//!
//! - [`source`]: where node and edge records come from
//! - [`store`]: where built graphs are kept, keyed by document version
//! - [`render`]: HTML visualization
//! - [`app`]: the build-or-reuse workflow tying them together
//!
//! ```
//! use flowdag::domain::{EdgeRecord, NodeRecord};
//! use flowdag::graph::Graph;
//!
//! let nodes = [NodeRecord::new("a"), NodeRecord::new("b")];
//! let edges = [EdgeRecord::new("a", "b"), EdgeRecord::new("b", "a")];
//!
//! let mut graph = Graph::new();
//! let report = graph.build_graph(&nodes, &edges, true).unwrap();
//!
//! assert!(report.cycles_detected);
//! assert!(!graph.has_cycle());
//! assert_eq!(graph.adjacency_matrix(), &[vec![0u8, 1], vec![0, 0]]);
//! ```

#![forbid(unsafe_code)]

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod graph;
pub mod render;
pub mod source;
pub mod store;

// Public CLI module (needed by binary)
pub mod cli;
pub mod output;

pub use error::{Error, Result};
