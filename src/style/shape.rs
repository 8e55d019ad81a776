use crate::error::{AlgomotionError, AlgomotionResult};

/// Node shape keywords. `hidden` is a valid literal but is excluded from
/// generated palettes so a grouped element never disappears by accident.
pub const NODE_SHAPES: &[&str] = &["circle", "square", "diamond", "triangle", "hexagon", "hidden"];

/// Edge shape (line style) keywords.
pub const EDGE_SHAPES: &[&str] = &["solid", "dashed", "dotted", "hidden"];

/// A normalized shape slug for either a node or an edge.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct Shape {
    slug: &'static str,
}

impl Shape {
    pub fn parse_node(literal: &str) -> AlgomotionResult<Self> {
        Self::parse_from(literal, NODE_SHAPES, "node shape")
    }

    pub fn parse_edge(literal: &str) -> AlgomotionResult<Self> {
        Self::parse_from(literal, EDGE_SHAPES, "edge shape")
    }

    pub fn is_node_shape(literal: &str) -> bool {
        Self::parse_node(literal).is_ok()
    }

    pub fn is_edge_shape(literal: &str) -> bool {
        Self::parse_edge(literal).is_ok()
    }

    pub fn slug(&self) -> &'static str {
        self.slug
    }

    /// The first `n` visible keywords, used as the discrete palette.
    pub fn palette(table: &'static [&'static str], n: usize) -> AlgomotionResult<Vec<Self>> {
        let visible: Vec<&'static str> = table
            .iter()
            .copied()
            .filter(|slug| *slug != "hidden")
            .collect();
        if n > visible.len() {
            return Err(AlgomotionError::too_few_styles(format!(
                "{n} groups requested but only {} shapes exist",
                visible.len()
            )));
        }
        Ok(visible[..n].iter().map(|slug| Self { slug }).collect())
    }

    fn parse_from(
        literal: &str,
        table: &'static [&'static str],
        kind: &str,
    ) -> AlgomotionResult<Self> {
        let trimmed = literal.trim();
        table
            .iter()
            .find(|slug| **slug == trimmed)
            .map(|slug| Self { slug })
            .ok_or_else(|| {
                AlgomotionError::invalid_style(format!("'{literal}' is not a known {kind}"))
            })
    }
}
