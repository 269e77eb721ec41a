//! On-disk formats for edge streams and label events.

mod csv;

pub use self::csv::{read_edges, read_node_labels, write_edges};
