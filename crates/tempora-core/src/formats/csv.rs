//! CSV ingestion.
//!
//! Edge files are headered: `source,destination,timestamp` are required,
//! `label` is optional, and every remaining numeric column is taken as an
//! edge feature in header order. Label-event files use
//! `timestamp,node,<class columns...>`.
//!
//! Raw exports often carry timestamps as floats; integral values are
//! accepted for any integer column, and fractional timestamps are
//! truncated with a warning rather than rejected.

use std::io::{Read, Write};

use tracing::warn;

use crate::edge::{FeatureMatrix, NodeId, Timestamp};
use crate::label::NodeLabelEvents;
use crate::stream::TemporalEdgeList;
use crate::{Error, Result};

const SOURCE: &str = "source";
const DESTINATION: &str = "destination";
const TIMESTAMP: &str = "timestamp";
const LABEL: &str = "label";
const NODE: &str = "node";

/// Read a temporal edge stream from headered CSV.
pub fn read_edges<R: Read>(reader: R) -> Result<TemporalEdgeList> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let src_col = find_column(&headers, SOURCE, "edge stream")?;
    let dst_col = find_column(&headers, DESTINATION, "edge stream")?;
    let ts_col = find_column(&headers, TIMESTAMP, "edge stream")?;
    let label_col = headers.iter().position(|h| h == LABEL);

    let reserved = [Some(src_col), Some(dst_col), Some(ts_col), label_col];
    let feat_cols: Vec<usize> = (0..headers.len())
        .filter(|i| !reserved.contains(&Some(*i)))
        .collect();

    let mut edges = TemporalEdgeList::new();
    let mut warned_fractional = false;
    let mut feat_row = Vec::with_capacity(feat_cols.len());

    for (row, record) in reader.records().enumerate() {
        let record = record?;

        let src = parse_id(&record[src_col], row)?;
        let dst = parse_id(&record[dst_col], row)?;
        let ts = parse_timestamp(&record[ts_col], row, &mut warned_fractional)?;
        let label = match label_col {
            Some(c) => parse_f32(&record[c], row)?,
            None => 1.0,
        };

        feat_row.clear();
        for &c in &feat_cols {
            feat_row.push(parse_f32(&record[c], row)?);
        }
        let feat = if feat_row.is_empty() {
            None
        } else {
            Some(feat_row.as_slice())
        };

        edges.push(src, dst, ts, feat, label)?;
    }

    edges.sort_by_time();
    Ok(edges)
}

/// Write an edge stream as headered CSV (inverse of [`read_edges`]).
pub fn write_edges<W: Write>(writer: W, edges: &TemporalEdgeList) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    let feat_dim = edges.features().map_or(0, |m| m.dim());
    let mut header = vec![
        SOURCE.to_string(),
        DESTINATION.to_string(),
        TIMESTAMP.to_string(),
        LABEL.to_string(),
    ];
    for i in 0..feat_dim {
        header.push(format!("f{i}"));
    }
    writer.write_record(&header)?;

    for i in 0..edges.len() {
        let view = edges.view(i);
        let mut record = vec![
            view.src.to_string(),
            view.dst.to_string(),
            view.ts.to_string(),
            view.label.to_string(),
        ];
        for &x in view.feat {
            record.push(x.to_string());
        }
        writer.write_record(&record)?;
    }

    writer.flush().map_err(Error::Io)?;
    Ok(())
}

/// Read node label events from headered CSV.
///
/// Every column other than `timestamp` and `node` is a class column; rows
/// are re-sorted by timestamp (stably) if the file is out of order.
pub fn read_node_labels<R: Read>(reader: R) -> Result<NodeLabelEvents> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let ts_col = find_column(&headers, TIMESTAMP, "node labels")?;
    let node_col = find_column(&headers, NODE, "node labels")?;

    let class_cols: Vec<usize> = (0..headers.len())
        .filter(|&i| i != ts_col && i != node_col)
        .collect();
    if class_cols.is_empty() {
        return Err(Error::MissingColumn("<class columns>", "node labels".into()));
    }

    let mut ts = Vec::new();
    let mut node = Vec::new();
    let mut flat = Vec::new();
    let mut warned_fractional = false;

    for (row, record) in reader.records().enumerate() {
        let record = record?;
        ts.push(parse_timestamp(&record[ts_col], row, &mut warned_fractional)?);
        node.push(parse_id(&record[node_col], row)?);
        for &c in &class_cols {
            flat.push(parse_f32(&record[c], row)?);
        }
    }

    if !ts.windows(2).all(|w| w[0] <= w[1]) {
        let mut perm: Vec<usize> = (0..ts.len()).collect();
        perm.sort_by_key(|&i| ts[i]);
        ts = perm.iter().map(|&i| ts[i]).collect();
        node = perm.iter().map(|&i| node[i]).collect();
        let dim = class_cols.len();
        let mut sorted_flat = Vec::with_capacity(flat.len());
        for &i in &perm {
            sorted_flat.extend_from_slice(&flat[i * dim..(i + 1) * dim]);
        }
        flat = sorted_flat;
    }

    let labels = FeatureMatrix::from_flat(flat, class_cols.len()).ok_or(
        Error::DimensionMismatch {
            expected: class_cols.len(),
            got: 0,
        },
    )?;
    NodeLabelEvents::new(ts, node, labels)
}

fn find_column(headers: &csv::StringRecord, name: &'static str, what: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| Error::MissingColumn(name, what.to_string()))
}

fn parse_id(cell: &str, row: usize) -> Result<NodeId> {
    let cell = cell.trim();
    if let Ok(v) = cell.parse::<NodeId>() {
        return Ok(v);
    }
    // Exports sometimes write ids as floats ("17.0").
    if let Ok(f) = cell.parse::<f64>() {
        if f >= 0.0 && f.fract() == 0.0 {
            return Ok(f as NodeId);
        }
    }
    Err(Error::BadCell {
        row,
        value: cell.to_string(),
        expected: "non-negative integer id",
    })
}

fn parse_timestamp(cell: &str, row: usize, warned: &mut bool) -> Result<Timestamp> {
    let cell = cell.trim();
    if let Ok(v) = cell.parse::<Timestamp>() {
        return Ok(v);
    }
    match cell.parse::<f64>() {
        Ok(f) if f >= 0.0 => {
            if f.fract() != 0.0 && !*warned {
                warn!("timestamp column is not integral; truncating fractional part");
                *warned = true;
            }
            Ok(f as Timestamp)
        }
        _ => Err(Error::BadCell {
            row,
            value: cell.to_string(),
            expected: "non-negative timestamp",
        }),
    }
}

fn parse_f32(cell: &str, row: usize) -> Result<f32> {
    cell.trim().parse::<f32>().map_err(|_| Error::BadCell {
        row,
        value: cell.to_string(),
        expected: "float",
    })
}
