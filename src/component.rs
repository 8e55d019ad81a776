use std::collections::BTreeMap;

use crate::error::AlgomotionResult;
use crate::frame::ComponentFrame;
use crate::graph::{Edges, Nodes, VisualGraph};
use crate::style::StyleDomain;
use crate::style::domains::{
    EdgeColor, EdgeLabel, EdgeShapeStyle, NodeColor, NodeLabel, NodeScale, NodeShapeStyle,
};
use crate::stylizer::{Source, StyleConfig, Stylizer};
use crate::tick::TransformedState;

/// A visualized graph: the container the algorithm mutates plus one optional
/// stylizer per visual property. Properties with no stylizer are simply
/// absent from the component's transformed and styled states.
#[derive(Default)]
pub struct GraphComponent {
    graph: VisualGraph,
    node_color: Option<Stylizer<Nodes, NodeColor>>,
    edge_color: Option<Stylizer<Edges, EdgeColor>>,
    node_shape: Option<Stylizer<Nodes, NodeShapeStyle>>,
    edge_shape: Option<Stylizer<Edges, EdgeShapeStyle>>,
    node_label: Option<Stylizer<Nodes, NodeLabel>>,
    edge_label: Option<Stylizer<Edges, EdgeLabel>>,
    node_scale: Option<Stylizer<Nodes, NodeScale>>,
}

impl GraphComponent {
    pub fn new(graph: VisualGraph) -> Self {
        Self {
            graph,
            ..Self::default()
        }
    }

    pub fn graph(&self) -> &VisualGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut VisualGraph {
        &mut self.graph
    }

    pub fn color_nodes_by(
        &mut self,
        source: Source<Nodes>,
        config: StyleConfig<String>,
        range: Option<(f64, f64)>,
    ) -> AlgomotionResult<()> {
        self.node_color = Some(Stylizer::new(source, config, range)?);
        Ok(())
    }

    pub fn color_edges_by(
        &mut self,
        source: Source<Edges>,
        config: StyleConfig<String>,
        range: Option<(f64, f64)>,
    ) -> AlgomotionResult<()> {
        self.edge_color = Some(Stylizer::new(source, config, range)?);
        Ok(())
    }

    pub fn shape_nodes_by(
        &mut self,
        source: Source<Nodes>,
        config: StyleConfig<String>,
    ) -> AlgomotionResult<()> {
        self.node_shape = Some(Stylizer::new(source, config, None)?);
        Ok(())
    }

    pub fn shape_edges_by(
        &mut self,
        source: Source<Edges>,
        config: StyleConfig<String>,
    ) -> AlgomotionResult<()> {
        self.edge_shape = Some(Stylizer::new(source, config, None)?);
        Ok(())
    }

    pub fn label_nodes_by(
        &mut self,
        source: Source<Nodes>,
        config: StyleConfig<String>,
    ) -> AlgomotionResult<()> {
        self.node_label = Some(Stylizer::new(source, config, None)?);
        Ok(())
    }

    pub fn label_edges_by(
        &mut self,
        source: Source<Edges>,
        config: StyleConfig<String>,
    ) -> AlgomotionResult<()> {
        self.edge_label = Some(Stylizer::new(source, config, None)?);
        Ok(())
    }

    pub fn scale_nodes_by(
        &mut self,
        source: Source<Nodes>,
        config: StyleConfig<f64>,
        range: Option<(f64, f64)>,
    ) -> AlgomotionResult<()> {
        self.node_scale = Some(Stylizer::new(source, config, range)?);
        Ok(())
    }

    /// Captures the raw view of this component for one tick: its elements
    /// plus the transform output of every registered stylizer.
    pub fn transformed_state(&mut self) -> Option<TransformedState> {
        let graph = &self.graph;
        let mut properties = BTreeMap::new();

        if let Some(s) = &mut self.node_color {
            properties.insert(NodeColor::PROPERTY.to_string(), s.transform(graph));
        }
        if let Some(s) = &mut self.edge_color {
            properties.insert(EdgeColor::PROPERTY.to_string(), s.transform(graph));
        }
        if let Some(s) = &mut self.node_shape {
            properties.insert(NodeShapeStyle::PROPERTY.to_string(), s.transform(graph));
        }
        if let Some(s) = &mut self.edge_shape {
            properties.insert(EdgeShapeStyle::PROPERTY.to_string(), s.transform(graph));
        }
        if let Some(s) = &mut self.node_label {
            properties.insert(NodeLabel::PROPERTY.to_string(), s.transform(graph));
        }
        if let Some(s) = &mut self.edge_label {
            properties.insert(EdgeLabel::PROPERTY.to_string(), s.transform(graph));
        }
        if let Some(s) = &mut self.node_scale {
            properties.insert(NodeScale::PROPERTY.to_string(), s.transform(graph));
        }

        Some(TransformedState {
            nodes: graph.node_ids().cloned().collect(),
            edges: graph.edge_ids().cloned().collect(),
            properties,
        })
    }

    /// Interprets every registered stylizer. Called once, after the run.
    pub fn interpret(&mut self) -> AlgomotionResult<()> {
        if let Some(s) = &mut self.node_color {
            s.interpret()?;
        }
        if let Some(s) = &mut self.edge_color {
            s.interpret()?;
        }
        if let Some(s) = &mut self.node_shape {
            s.interpret()?;
        }
        if let Some(s) = &mut self.edge_shape {
            s.interpret()?;
        }
        if let Some(s) = &mut self.node_label {
            s.interpret()?;
        }
        if let Some(s) = &mut self.edge_label {
            s.interpret()?;
        }
        if let Some(s) = &mut self.node_scale {
            s.interpret()?;
        }
        Ok(())
    }

    /// Styles a captured state. Null state propagates to a null component;
    /// a component that ends up with no styled properties is dropped.
    pub fn compute(&self, state: Option<&TransformedState>) -> Option<ComponentFrame> {
        let state = state?;
        let mut style = BTreeMap::new();

        if let Some(s) = &self.node_color {
            if let Some(map) = s.compute(state.properties.get(NodeColor::PROPERTY)) {
                style.insert(NodeColor::PROPERTY.to_string(), map);
            }
        }
        if let Some(s) = &self.edge_color {
            if let Some(map) = s.compute(state.properties.get(EdgeColor::PROPERTY)) {
                style.insert(EdgeColor::PROPERTY.to_string(), map);
            }
        }
        if let Some(s) = &self.node_shape {
            if let Some(map) = s.compute(state.properties.get(NodeShapeStyle::PROPERTY)) {
                style.insert(NodeShapeStyle::PROPERTY.to_string(), map);
            }
        }
        if let Some(s) = &self.edge_shape {
            if let Some(map) = s.compute(state.properties.get(EdgeShapeStyle::PROPERTY)) {
                style.insert(EdgeShapeStyle::PROPERTY.to_string(), map);
            }
        }
        if let Some(s) = &self.node_label {
            if let Some(map) = s.compute(state.properties.get(NodeLabel::PROPERTY)) {
                style.insert(NodeLabel::PROPERTY.to_string(), map);
            }
        }
        if let Some(s) = &self.edge_label {
            if let Some(map) = s.compute(state.properties.get(EdgeLabel::PROPERTY)) {
                style.insert(EdgeLabel::PROPERTY.to_string(), map);
            }
        }
        if let Some(s) = &self.node_scale {
            if let Some(map) = s.compute(state.properties.get(NodeScale::PROPERTY)) {
                style.insert(NodeScale::PROPERTY.to_string(), map);
            }
        }

        if style.is_empty() {
            return None;
        }

        Some(ComponentFrame {
            nodes: state.nodes.clone(),
            edges: state.edges.clone(),
            style,
        })
    }

    pub fn node_color_stylizer(&self) -> Option<&Stylizer<Nodes, NodeColor>> {
        self.node_color.as_ref()
    }

    pub fn edge_color_stylizer(&self) -> Option<&Stylizer<Edges, EdgeColor>> {
        self.edge_color.as_ref()
    }

    pub fn node_shape_stylizer(&self) -> Option<&Stylizer<Nodes, NodeShapeStyle>> {
        self.node_shape.as_ref()
    }

    pub fn node_scale_stylizer(&self) -> Option<&Stylizer<Nodes, NodeScale>> {
        self.node_scale.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::RawValue;
    use crate::style::StyleValue;

    fn component_with_layers() -> GraphComponent {
        let mut g = VisualGraph::new();
        g.add_edge("a", "b");
        g.set_node_attr("a", "layer", 0i64);
        g.set_node_attr("b", "layer", 1i64);
        GraphComponent::new(g)
    }

    #[test]
    fn state_includes_only_registered_properties() {
        let mut c = component_with_layers();
        c.color_nodes_by(Source::prop("layer"), StyleConfig::None, None)
            .unwrap();

        let state = c.transformed_state().unwrap();
        assert_eq!(state.nodes, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(state.properties.len(), 1);
        let colors = &state.properties["node_color"];
        assert_eq!(colors["a"], Some(RawValue::Int(0)));
    }

    #[test]
    fn compute_skips_properties_missing_from_the_state() {
        let mut c = component_with_layers();

        // State captured before the stylizer existed has no color entry.
        let early = c.transformed_state().unwrap();

        c.color_nodes_by(Source::prop("layer"), StyleConfig::None, None)
            .unwrap();
        let late = c.transformed_state().unwrap();
        c.interpret().unwrap();

        assert!(c.compute(Some(&early)).is_none());
        let styled = c.compute(Some(&late)).unwrap();
        assert!(styled.style.contains_key("node_color"));
        assert_eq!(c.compute(None), None);
    }

    #[test]
    fn labels_stringify_through_identity() {
        let mut c = component_with_layers();
        c.label_nodes_by(Source::prop("layer"), StyleConfig::None)
            .unwrap();
        let state = c.transformed_state().unwrap();
        c.interpret().unwrap();

        let styled = c.compute(Some(&state)).unwrap();
        let labels = &styled.style["node_label"];
        assert_eq!(labels["a"], Some(StyleValue::Label("0".to_string())));
        assert_eq!(labels["b"], Some(StyleValue::Label("1".to_string())));
    }
}
