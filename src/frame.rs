use std::collections::BTreeMap;

use crate::graph::NodeId;
use crate::stylizer::StyleMap;

/// The fully styled view of one component inside a frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ComponentFrame {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<(NodeId, NodeId)>,
    /// Property name to per-element styles, e.g. `node_color` to a map of
    /// node id to hex color.
    pub style: BTreeMap<String, StyleMap>,
}

impl ComponentFrame {
    /// At least one element of one property carries an actual style.
    pub fn has_visible_style(&self) -> bool {
        self.style
            .values()
            .any(|map| map.values().any(Option::is_some))
    }
}

/// One post-interpretation snapshot of the playback timeline. Merging
/// accumulates line markers and concatenates console text, so a frame may
/// cover several executed lines.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Frame {
    pub lineno: Vec<u32>,
    pub console_logs: String,
    pub components: Vec<ComponentFrame>,
}

impl Frame {
    pub fn has_console_logs(&self) -> bool {
        !self.console_logs.is_empty()
    }

    /// Whether the frame is worth keeping at all. Console text always is;
    /// otherwise at least one component must carry a visible style.
    pub fn is_meaningful(&self) -> bool {
        if self.has_console_logs() {
            return true;
        }
        self.components.iter().any(ComponentFrame::has_visible_style)
    }

    /// Merges a chronologically earlier, style-equal frame into this one:
    /// its line markers and console text come first.
    pub fn absorb_earlier(&mut self, earlier: Frame) {
        let mut lineno = earlier.lineno;
        lineno.append(&mut self.lineno);
        self.lineno = lineno;

        let mut console_logs = earlier.console_logs;
        console_logs.push_str(&self.console_logs);
        self.console_logs = console_logs;
    }
}

/// Frames are equal when their styled components are equal. Console text and
/// line markers ride along through merges and never participate.
impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}
