use std::collections::BTreeMap;

use crate::graph::NodeId;
use crate::stylizer::RawMap;

/// Why a sample was taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TickSource {
    /// The tracer stepped onto a new line.
    Line,
    /// An observed variable changed.
    Vars,
    /// The user explicitly requested a sample.
    User,
    /// A stylization call triggered the sample.
    Stylizer,
}

/// The raw, pre-interpretation view of one component at one moment:
/// its elements plus the transform output of every registered stylizer.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TransformedState {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<(NodeId, NodeId)>,
    pub properties: BTreeMap<String, RawMap>,
}

/// One raw snapshot captured during the run. Ticks compare pre-interpretation
/// data; styling happens later, when a tick becomes a frame.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Tick {
    /// Monotonic id, assigned only to retained ticks.
    pub id: u64,
    pub source: TickSource,
    pub lineno: u32,
    pub console_logs: String,
    /// One entry per active component, in declaration order.
    pub states: Vec<Option<TransformedState>>,
}

impl Tick {
    /// Equality used for inline deduplication: same source and deep-equal
    /// component states. Console text and line markers are not compared.
    pub fn same_observation(&self, other: &Self) -> bool {
        self.source == other.source && self.states == other.states
    }

    pub fn has_console_logs(&self) -> bool {
        !self.console_logs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(marker: i64) -> Option<TransformedState> {
        let mut properties = BTreeMap::new();
        properties.insert(
            "node_color".to_string(),
            BTreeMap::from([("a".to_string(), Some(crate::raw::RawValue::Int(marker)))]),
        );
        Some(TransformedState {
            nodes: vec!["a".to_string()],
            edges: vec![],
            properties,
        })
    }

    #[test]
    fn observation_equality_ignores_line_and_console() {
        let a = Tick {
            id: 0,
            source: TickSource::Line,
            lineno: 3,
            console_logs: "hello".to_string(),
            states: vec![state(1)],
        };
        let b = Tick {
            id: 7,
            source: TickSource::Line,
            lineno: 9,
            console_logs: String::new(),
            states: vec![state(1)],
        };
        assert!(a.same_observation(&b));

        let c = Tick {
            source: TickSource::User,
            ..b.clone()
        };
        assert!(!a.same_observation(&c));

        let d = Tick {
            states: vec![state(2)],
            ..b
        };
        assert!(!a.same_observation(&d));
    }
}
