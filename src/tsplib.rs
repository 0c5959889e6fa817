//! Reader for the node coordinates of TSPLIB files.
//!
//! Only `NODE_COORD_SECTION` and the `NAME` header are read; everything the
//! engine does not need is skipped.

use crate::error::{AcoError, AcoResult};
use crate::problem::Node;
use std::path::Path;

/// Nodes read from a TSPLIB document.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeCoords {
    /// Value of the `NAME` header, if present
    pub name: Option<String>,
    /// Nodes in file order, re-indexed from `0`
    pub nodes: Vec<Node>,
}

/// Read and parse a TSPLIB file. Falls back to the file stem when the file
/// has no `NAME` header.
pub fn read_node_coords(path: &Path) -> AcoResult<NodeCoords> {
    let content = std::fs::read_to_string(path)?;
    let mut coords = parse_node_coords(&content)?;
    if coords.name.is_none() {
        coords.name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string);
    }
    Ok(coords)
}

/// Parse the coordinate section of a TSPLIB document.
pub fn parse_node_coords(content: &str) -> AcoResult<NodeCoords> {
    let mut name = None;
    let mut nodes = Vec::new();
    let mut in_coords = false;

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();
        let line_no = Some(line_num + 1);

        if line.is_empty() {
            continue;
        }
        if line == "EOF" {
            break;
        }
        if line == "NODE_COORD_SECTION" {
            in_coords = true;
            continue;
        }

        if in_coords {
            if line.ends_with("_SECTION") {
                in_coords = false;
                continue;
            }
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 3 {
                return Err(AcoError::data_format(
                    line_no,
                    format!("expected `id x y`, got `{line}`"),
                ));
            }
            let x = parse_coord(parts[1], "x", line_no)?;
            let y = parse_coord(parts[2], "y", line_no)?;
            nodes.push(Node::new(nodes.len(), x, y));
            continue;
        }

        if let Some((key, value)) = line.split_once(':') {
            if key.trim().eq_ignore_ascii_case("NAME") {
                name = Some(value.trim().to_string());
            }
        }
    }

    if nodes.is_empty() {
        return Err(AcoError::data_format(None, "no node coordinates found"));
    }
    Ok(NodeCoords { name, nodes })
}

fn parse_coord(raw: &str, axis: &str, line: Option<usize>) -> AcoResult<f64> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(AcoError::data_format(
            line,
            format!("invalid {axis} coordinate: {raw}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "NAME : square4
COMMENT : unit square
TYPE : TSP
DIMENSION : 4
EDGE_WEIGHT_TYPE : EUC_2D
NODE_COORD_SECTION
1 0 0
2 1 0
3 1.0 1.0
4 0 1e0
EOF
";

    #[test]
    fn test_parse_small_file() {
        let coords = parse_node_coords(SMALL).expect("should parse");
        assert_eq!(coords.name.as_deref(), Some("square4"));
        assert_eq!(coords.nodes.len(), 4);
        assert_eq!(coords.nodes[2], Node::new(2, 1.0, 1.0));
        assert_eq!(coords.nodes[3], Node::new(3, 0.0, 1.0));
    }

    #[test]
    fn test_stops_at_eof() {
        let content = "NODE_COORD_SECTION\n1 0 0\n2 3 4\nEOF\ngarbage that is ignored\n";
        let coords = parse_node_coords(content).unwrap();
        assert_eq!(coords.nodes.len(), 2);
        assert_eq!(coords.name, None);
    }

    #[test]
    fn test_rejects_short_record() {
        let content = "NODE_COORD_SECTION\n1 0 0\n2 3\nEOF\n";
        match parse_node_coords(content).unwrap_err() {
            AcoError::DataFormat { line, .. } => assert_eq!(line, Some(3)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_bad_number() {
        let content = "NODE_COORD_SECTION\n1 0 zero\nEOF\n";
        let err = parse_node_coords(content).unwrap_err();
        assert!(err.to_string().contains("invalid y coordinate"));
    }

    #[test]
    fn test_rejects_missing_section() {
        let err = parse_node_coords("NAME : empty\nEOF\n").unwrap_err();
        assert!(matches!(err, AcoError::DataFormat { line: None, .. }));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_node_coords(Path::new("/definitely/not/here.tsp")).unwrap_err();
        assert!(matches!(err, AcoError::Io(_)));
    }
}
