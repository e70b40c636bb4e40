//! Decoders for single `.mail` records.
//!
//! All decoders split on runs of whitespace and parse numbers with Rust's
//! locale-independent `str::parse`, so `1.5` is always one and a half and
//! `1,5` is always an error.

use nalgebra::Point3;

/// A decoded coordinate line: `[label] x y z`.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateRecord {
    /// Node label (`N17`), if the line carried one.
    pub label: Option<String>,
    /// The node position.
    pub point: Point3<f64>,
}

/// A decoded connectivity line: `[label] r1 ... rN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectivityRecord {
    /// Element label (`M4`), if the line carried one.
    pub label: Option<String>,
    /// Node numbers with their alphabetic prefix removed.
    pub nodes: Vec<u64>,
}

/// Decode a coordinate record.
///
/// Four fields mean the first is a node label; three mean the line is
/// unlabelled. The error string describes the first problem found.
pub fn parse_coordinates(line: &str) -> Result<CoordinateRecord, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let (label, values) = match fields.len() {
        4 => (Some(fields[0].to_string()), &fields[1..]),
        3 => (None, &fields[..]),
        n => return Err(format!("expected 3 coordinates, found {} fields", n)),
    };

    let mut xyz = [0.0; 3];
    for (slot, token) in xyz.iter_mut().zip(values) {
        *slot = token
            .parse::<f64>()
            .map_err(|_| format!("invalid coordinate '{}'", token))?;
    }

    Ok(CoordinateRecord {
        label,
        point: Point3::new(xyz[0], xyz[1], xyz[2]),
    })
}

/// Decode a connectivity record with exactly `arity` node references.
///
/// A line of `arity + 1` fields starts with an element label. A line of
/// `arity` fields is unlabelled and must then consist of bare integers, so a
/// labelled record missing a reference (`M4 N1 N2 N3` for a quadrangle) is an
/// error rather than a record whose label became a node.
pub fn parse_connectivity(line: &str, arity: usize) -> Result<ConnectivityRecord, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let (label, refs) = if fields.len() == arity + 1 {
        (Some(fields[0].to_string()), &fields[1..])
    } else if fields.len() == arity {
        if let Some(token) = fields.iter().find(|t| !t.bytes().all(|b| b.is_ascii_digit())) {
            return Err(format!(
                "expected {} node references, found {} fields with label-like '{}'",
                arity,
                fields.len(),
                token
            ));
        }
        (None, &fields[..])
    } else {
        return Err(format!(
            "expected {} node references, found {} fields",
            arity,
            fields.len()
        ));
    };

    let nodes = refs
        .iter()
        .map(|token| {
            parse_reference(token).ok_or_else(|| format!("invalid node reference '{}'", token))
        })
        .collect::<Result<Vec<u64>, String>>()?;

    Ok(ConnectivityRecord { label, nodes })
}

/// Decode a group member line by keeping only its digits.
///
/// `"N4  "` gives 4. A line without any digit is an error.
pub fn parse_group_member(line: &str) -> Result<u64, String> {
    let digits: String = line.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(format!("group member '{}' has no index", line));
    }
    digits
        .parse::<u64>()
        .map_err(|_| format!("group member '{}' is out of range", line))
}

/// Strip an alphabetic prefix (`N12` -> 12) and parse the rest.
pub fn parse_reference(token: &str) -> Option<u64> {
    let digits = token.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
