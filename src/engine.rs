use std::mem;

use crate::component::GraphComponent;
use crate::error::AlgomotionResult;
use crate::frame::Frame;
use crate::graph::{Edges, Nodes, VisualGraph};
use crate::stylizer::{Source, StyleConfig};
use crate::tick::{Tick, TickSource};
use crate::ticker::Ticker;

pub type NodeSource = Source<Nodes>;
pub type EdgeSource = Source<Edges>;

/// An index into the engine's component list. Handles stay valid for the
/// whole run; components are never removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphHandle(usize);

/// The orchestrator of one visualized run: owns the components, collects
/// ticks while the algorithm executes, and builds the compressed frame list
/// afterwards. One engine per run; runs share no state.
#[derive(Default)]
pub struct Engine {
    components: Vec<GraphComponent>,
    ticker: Ticker,
    console: String,
    lineno: u32,
    interpreted: bool,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an undirected graph component.
    pub fn add_graph(&mut self) -> GraphHandle {
        self.components.push(GraphComponent::new(VisualGraph::new()));
        GraphHandle(self.components.len() - 1)
    }

    /// Registers a directed graph component.
    pub fn add_digraph(&mut self) -> GraphHandle {
        self.components
            .push(GraphComponent::new(VisualGraph::directed()));
        GraphHandle(self.components.len() - 1)
    }

    pub fn graph(&self, handle: GraphHandle) -> &VisualGraph {
        self.components[handle.0].graph()
    }

    pub fn graph_mut(&mut self, handle: GraphHandle) -> &mut VisualGraph {
        self.components[handle.0].graph_mut()
    }

    pub fn component(&self, handle: GraphHandle) -> &GraphComponent {
        &self.components[handle.0]
    }

    /// Captured console output. Buffered text rides on the next tick.
    pub fn print(&mut self, text: &str) {
        self.console.push_str(text);
        self.console.push('\n');
    }

    /// Records the current line marker and samples, as the tracer does once
    /// per executed line.
    pub fn trace_line(&mut self, lineno: u32) {
        self.lineno = lineno;
        self.tick(TickSource::Line);
    }

    /// Samples the current state of every component into a candidate tick.
    pub fn tick(&mut self, source: TickSource) {
        if self.components.is_empty() {
            return;
        }
        let console = mem::take(&mut self.console);
        let states = self
            .components
            .iter_mut()
            .map(GraphComponent::transformed_state)
            .collect();
        self.ticker.tick(source, self.lineno, console, states);
    }

    pub fn color_nodes_by(
        &mut self,
        handle: GraphHandle,
        source: NodeSource,
        config: StyleConfig<String>,
        range: Option<(f64, f64)>,
    ) -> AlgomotionResult<()> {
        self.components[handle.0].color_nodes_by(source, config, range)?;
        self.tick(TickSource::Stylizer);
        Ok(())
    }

    pub fn color_edges_by(
        &mut self,
        handle: GraphHandle,
        source: EdgeSource,
        config: StyleConfig<String>,
        range: Option<(f64, f64)>,
    ) -> AlgomotionResult<()> {
        self.components[handle.0].color_edges_by(source, config, range)?;
        self.tick(TickSource::Stylizer);
        Ok(())
    }

    pub fn shape_nodes_by(
        &mut self,
        handle: GraphHandle,
        source: NodeSource,
        config: StyleConfig<String>,
    ) -> AlgomotionResult<()> {
        self.components[handle.0].shape_nodes_by(source, config)?;
        self.tick(TickSource::Stylizer);
        Ok(())
    }

    pub fn shape_edges_by(
        &mut self,
        handle: GraphHandle,
        source: EdgeSource,
        config: StyleConfig<String>,
    ) -> AlgomotionResult<()> {
        self.components[handle.0].shape_edges_by(source, config)?;
        self.tick(TickSource::Stylizer);
        Ok(())
    }

    pub fn label_nodes_by(
        &mut self,
        handle: GraphHandle,
        source: NodeSource,
        config: StyleConfig<String>,
    ) -> AlgomotionResult<()> {
        self.components[handle.0].label_nodes_by(source, config)?;
        self.tick(TickSource::Stylizer);
        Ok(())
    }

    pub fn label_edges_by(
        &mut self,
        handle: GraphHandle,
        source: EdgeSource,
        config: StyleConfig<String>,
    ) -> AlgomotionResult<()> {
        self.components[handle.0].label_edges_by(source, config)?;
        self.tick(TickSource::Stylizer);
        Ok(())
    }

    pub fn scale_nodes_by(
        &mut self,
        handle: GraphHandle,
        source: NodeSource,
        config: StyleConfig<f64>,
        range: Option<(f64, f64)>,
    ) -> AlgomotionResult<()> {
        self.components[handle.0].scale_nodes_by(source, config, range)?;
        self.tick(TickSource::Stylizer);
        Ok(())
    }

    /// Finishes the run: interprets every stylizer (exactly once, even if
    /// called again), then styles and compresses the retained ticks into the
    /// playback frame list. Interpretation errors propagate; the collected
    /// ticks stay available for inspection alongside the error.
    #[tracing::instrument(skip(self))]
    pub fn build_frames(&mut self) -> AlgomotionResult<Vec<Frame>> {
        if !self.interpreted {
            for component in &mut self.components {
                component.interpret()?;
            }
            self.interpreted = true;
        }

        let components = &self.components;
        let frames = self.ticker.to_frames(|tick| frame_of(components, tick));
        tracing::debug!(frames = frames.len(), "built frames");
        Ok(frames)
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }
}

fn frame_of(components: &[GraphComponent], tick: &Tick) -> Frame {
    let styled = components
        .iter()
        .zip(&tick.states)
        .filter_map(|(component, state)| component.compute(state.as_ref()))
        .collect();
    Frame {
        lineno: vec![tick.lineno],
        console_logs: tick.console_logs.clone(),
        components: styled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_without_components_is_ignored() {
        let mut engine = Engine::new();
        engine.trace_line(1);
        assert!(engine.ticker().is_empty());
    }

    #[test]
    fn stylization_call_triggers_a_sample() {
        let mut engine = Engine::new();
        let g = engine.add_graph();
        engine.graph_mut(g).add_node("a");

        engine
            .color_nodes_by(g, NodeSource::prop("seen"), StyleConfig::None, None)
            .unwrap();

        assert_eq!(engine.ticker().len(), 1);
        assert_eq!(engine.ticker().ticks()[0].source, TickSource::Stylizer);
    }

    #[test]
    fn console_buffer_drains_into_the_next_tick() {
        let mut engine = Engine::new();
        let g = engine.add_graph();
        engine.graph_mut(g).add_node("a");
        engine
            .label_nodes_by(g, NodeSource::prop("tag"), StyleConfig::None)
            .unwrap();

        engine.print("first");
        engine.print("second");
        engine.trace_line(5);

        let tick = engine.ticker().ticks().last().unwrap();
        assert_eq!(tick.console_logs, "first\nsecond\n");
        assert_eq!(tick.lineno, 5);

        // Buffer was drained; a duplicate silent tick is now dropped.
        let before = engine.ticker().len();
        engine.trace_line(6);
        assert_eq!(engine.ticker().len(), before);
    }

    #[test]
    fn build_frames_is_stable_across_calls() {
        let mut engine = Engine::new();
        let g = engine.add_graph();
        engine.graph_mut(g).add_node("a");
        engine
            .color_nodes_by(
                g,
                NodeSource::members(["a".to_string()]),
                StyleConfig::None,
                None,
            )
            .unwrap();
        engine.trace_line(1);

        let first = engine.build_frames().unwrap();
        let second = engine.build_frames().unwrap();
        assert_eq!(first.len(), second.len());
        assert!(!first.is_empty());
    }

    #[test]
    fn interpretation_errors_keep_ticks_available() {
        let mut engine = Engine::new();
        let g = engine.add_graph();
        for (i, id) in ["a", "b", "c", "d"].iter().enumerate() {
            engine.graph_mut(g).add_node(*id);
            engine.graph_mut(g).set_node_attr(*id, "layer", i as i64);
        }
        engine
            .color_nodes_by(
                g,
                NodeSource::prop("layer"),
                StyleConfig::List(vec![
                    "red".to_string(),
                    "green".to_string(),
                    "blue".to_string(),
                ]),
                None,
            )
            .unwrap();
        engine.trace_line(1);

        assert!(engine.build_frames().is_err());
        assert!(!engine.ticker().is_empty());
    }
}
