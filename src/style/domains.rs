//! The per-property style domains wired into the generic stylizer.

use crate::error::{AlgomotionError, AlgomotionResult};
use crate::palette;
use crate::raw::RawValue;
use crate::style::color::Color;
use crate::style::shape::{EDGE_SHAPES, NODE_SHAPES, Shape};
use crate::style::{StyleDomain, StyleValue};

fn color_from_raw(raw: &RawValue) -> Option<Color> {
    match raw {
        RawValue::Str(s) => Color::parse(s).ok(),
        _ => None,
    }
}

fn default_true_color() -> Option<Color> {
    Some(Color::new(0.0, 0.0, 1.0, 1.0)) // blue
}

/// Node fill color.
pub struct NodeColor;

impl StyleDomain for NodeColor {
    type Style = Color;
    type Literal = String;

    const PROPERTY: &'static str = "node_color";

    fn parse_literal(literal: &String) -> AlgomotionResult<Color> {
        Color::parse(literal)
    }

    fn style_from_raw(raw: &RawValue) -> Option<Color> {
        color_from_raw(raw)
    }

    fn default_true() -> Option<Color> {
        default_true_color()
    }

    fn supports_spectral() -> bool {
        true
    }

    fn discrete_palette(n: usize) -> AlgomotionResult<Vec<Color>> {
        Ok(palette::discrete(n))
    }

    fn continuous(t: f64) -> Option<Color> {
        Some(palette::spectral(t))
    }

    fn to_value(style: &Color) -> StyleValue {
        StyleValue::Color(*style)
    }
}

/// Edge stroke color.
pub struct EdgeColor;

impl StyleDomain for EdgeColor {
    type Style = Color;
    type Literal = String;

    const PROPERTY: &'static str = "edge_color";

    fn parse_literal(literal: &String) -> AlgomotionResult<Color> {
        Color::parse(literal)
    }

    fn style_from_raw(raw: &RawValue) -> Option<Color> {
        color_from_raw(raw)
    }

    fn default_true() -> Option<Color> {
        default_true_color()
    }

    fn supports_spectral() -> bool {
        true
    }

    fn discrete_palette(n: usize) -> AlgomotionResult<Vec<Color>> {
        Ok(palette::discrete(n))
    }

    fn continuous(t: f64) -> Option<Color> {
        Some(palette::spectral(t))
    }

    fn to_value(style: &Color) -> StyleValue {
        StyleValue::Color(*style)
    }
}

/// Node outline shape.
pub struct NodeShapeStyle;

impl StyleDomain for NodeShapeStyle {
    type Style = Shape;
    type Literal = String;

    const PROPERTY: &'static str = "node_shape";

    fn parse_literal(literal: &String) -> AlgomotionResult<Shape> {
        Shape::parse_node(literal)
    }

    fn style_from_raw(raw: &RawValue) -> Option<Shape> {
        match raw {
            RawValue::Str(s) => Shape::parse_node(s).ok(),
            _ => None,
        }
    }

    fn default_true() -> Option<Shape> {
        Shape::parse_node("square").ok()
    }

    fn discrete_palette(n: usize) -> AlgomotionResult<Vec<Shape>> {
        Shape::palette(NODE_SHAPES, n)
    }

    fn to_value(style: &Shape) -> StyleValue {
        StyleValue::Shape(style.clone())
    }
}

/// Edge line style.
pub struct EdgeShapeStyle;

impl StyleDomain for EdgeShapeStyle {
    type Style = Shape;
    type Literal = String;

    const PROPERTY: &'static str = "edge_shape";

    fn parse_literal(literal: &String) -> AlgomotionResult<Shape> {
        Shape::parse_edge(literal)
    }

    fn style_from_raw(raw: &RawValue) -> Option<Shape> {
        match raw {
            RawValue::Str(s) => Shape::parse_edge(s).ok(),
            _ => None,
        }
    }

    fn default_true() -> Option<Shape> {
        Shape::parse_edge("dashed").ok()
    }

    fn discrete_palette(n: usize) -> AlgomotionResult<Vec<Shape>> {
        Shape::palette(EDGE_SHAPES, n)
    }

    fn to_value(style: &Shape) -> StyleValue {
        StyleValue::Shape(style.clone())
    }
}

fn label_from_raw(raw: &RawValue) -> Option<String> {
    // Every scalar stringifies, so unconfigured label sources resolve to
    // identity interpretation.
    Some(raw.to_string())
}

/// Node text label.
pub struct NodeLabel;

impl StyleDomain for NodeLabel {
    type Style = String;
    type Literal = String;

    const PROPERTY: &'static str = "node_label";

    fn parse_literal(literal: &String) -> AlgomotionResult<String> {
        Ok(literal.clone())
    }

    fn style_from_raw(raw: &RawValue) -> Option<String> {
        label_from_raw(raw)
    }

    fn default_true() -> Option<String> {
        Some("true".to_string())
    }

    fn discrete_palette(n: usize) -> AlgomotionResult<Vec<String>> {
        Err(AlgomotionError::invalid_style(format!(
            "cannot generate {n} label styles; labels take explicit values only"
        )))
    }

    fn to_value(style: &String) -> StyleValue {
        StyleValue::Label(style.clone())
    }
}

/// Edge text label.
pub struct EdgeLabel;

impl StyleDomain for EdgeLabel {
    type Style = String;
    type Literal = String;

    const PROPERTY: &'static str = "edge_label";

    fn parse_literal(literal: &String) -> AlgomotionResult<String> {
        Ok(literal.clone())
    }

    fn style_from_raw(raw: &RawValue) -> Option<String> {
        label_from_raw(raw)
    }

    fn default_true() -> Option<String> {
        Some("true".to_string())
    }

    fn discrete_palette(n: usize) -> AlgomotionResult<Vec<String>> {
        Err(AlgomotionError::invalid_style(format!(
            "cannot generate {n} label styles; labels take explicit values only"
        )))
    }

    fn to_value(style: &String) -> StyleValue {
        StyleValue::Label(style.clone())
    }
}

// Scale band used by generated palettes and the continuous mapping.
const SCALE_BAND: (f64, f64) = (0.75, 1.75);

/// Node size multiplier.
pub struct NodeScale;

impl StyleDomain for NodeScale {
    type Style = f64;
    type Literal = f64;

    const PROPERTY: &'static str = "node_scale";

    fn parse_literal(literal: &f64) -> AlgomotionResult<f64> {
        if literal.is_finite() && *literal > 0.0 {
            Ok(*literal)
        } else {
            Err(AlgomotionError::invalid_style(format!(
                "'{literal}' is not a positive finite scale"
            )))
        }
    }

    fn style_from_raw(raw: &RawValue) -> Option<f64> {
        raw.as_f64().filter(|x| x.is_finite() && *x > 0.0)
    }

    fn default_true() -> Option<f64> {
        Some(1.5)
    }

    fn supports_spectral() -> bool {
        true
    }

    fn discrete_palette(n: usize) -> AlgomotionResult<Vec<f64>> {
        let (lo, hi) = SCALE_BAND;
        Ok(match n {
            0 => Vec::new(),
            1 => vec![(lo + hi) / 2.0],
            _ => (0..n)
                .map(|i| lo + (hi - lo) * i as f64 / (n - 1) as f64)
                .collect(),
        })
    }

    fn continuous(t: f64) -> Option<f64> {
        Some(0.5 + 1.5 * t)
    }

    fn to_value(style: &f64) -> StyleValue {
        StyleValue::Scale(*style)
    }
}
