//! Compact string form of node locations.
//!
//! A location is a reference node followed by navigation steps, with runs of
//! the same step collapsed into a count: `"bfn3"` means "from `<body>`, first
//! child, then three next siblings". A count of one is implicit.

use std::fmt::Write as _;

use crate::error::LocationError;
use crate::navigation::NodeNavigationStep;

/// Node a location is relative to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferenceNode {
    /// The component host element (`h`).
    Host,
    /// The document `<body>` (`b`).
    Body,
    /// A node addressed by its index in the serialized view.
    Index(u32),
}

impl ReferenceNode {
    fn write_to(self, out: &mut String) {
        match self {
            Self::Host => out.push('h'),
            Self::Body => out.push('b'),
            Self::Index(i) => {
                let _ = write!(out, "{i}");
            }
        }
    }
}

/// Decoded node location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeLocation {
    /// Node the steps start from.
    pub reference: ReferenceNode,
    /// Expanded navigation steps.
    pub steps: Vec<NodeNavigationStep>,
}

/// Encode `steps` relative to `reference`.
#[must_use]
pub fn compress_node_location(reference: ReferenceNode, steps: &[NodeNavigationStep]) -> String {
    let mut out = String::new();
    reference.write_to(&mut out);

    let mut rest = steps;
    while let Some(&step) = rest.first() {
        let run = rest.iter().take_while(|&&s| s == step).count();
        out.push(step.as_char());
        if run > 1 {
            let _ = write!(out, "{run}");
        }
        rest = &rest[run..];
    }
    out
}

/// Decode a location produced by [`compress_node_location`].
///
/// # Errors
///
/// Returns [`LocationError`] if the reference node is missing, a step
/// character is unknown, or a number overflows.
pub fn decompress_node_location(location: &str) -> Result<NodeLocation, LocationError> {
    let digits = location.bytes().take_while(u8::is_ascii_digit).count();

    let (reference, mut offset) = if digits > 0 {
        let index = location[..digits]
            .parse()
            .map_err(|_| LocationError::NumberOutOfRange(0))?;
        (ReferenceNode::Index(index), digits)
    } else {
        match location.chars().next() {
            Some('h') => (ReferenceNode::Host, 1),
            Some('b') => (ReferenceNode::Body, 1),
            _ => return Err(LocationError::MissingReference(location.to_owned())),
        }
    };

    let mut steps = Vec::new();
    while let Some(c) = location[offset..].chars().next() {
        let step = NodeNavigationStep::from_char(c)
            .ok_or(LocationError::UnknownStep { found: c, offset })?;
        offset += c.len_utf8();

        let count_len = location[offset..]
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        let repeat = if count_len == 0 {
            1
        } else {
            location[offset..offset + count_len]
                .parse::<usize>()
                .map_err(|_| LocationError::NumberOutOfRange(offset))?
        };
        offset += count_len;

        steps.extend(std::iter::repeat_n(step, repeat));
    }

    Ok(NodeLocation { reference, steps })
}
