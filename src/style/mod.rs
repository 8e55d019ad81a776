pub mod color;
pub mod domains;
pub mod shape;

use crate::error::AlgomotionResult;
use crate::raw::RawValue;
pub use color::Color;
pub use shape::Shape;

/// The common, frame-facing style type. Every style domain converts its
/// computed styles into this enum so heterogeneous properties can live in
/// one frame. Serialization follows the output contract: colors as hex
/// strings, shapes as slugs, labels as strings, scales as numbers.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum StyleValue {
    Color(Color),
    Shape(Shape),
    Label(String),
    Scale(f64),
}

/// One visual property's style vocabulary.
///
/// A domain knows how to validate user-supplied literals (eagerly, at
/// stylizer construction), how to recognize a raw value that is already a
/// valid style (identity guessing), and how to produce generated palettes
/// for group and spectral interpretations.
pub trait StyleDomain {
    type Style: Clone + PartialEq + std::fmt::Debug;
    type Literal: Clone + std::fmt::Debug;

    /// Property name in the frame output, e.g. `node_color`.
    const PROPERTY: &'static str;

    /// Parses and validates a user-supplied style literal. Fails fast.
    fn parse_literal(literal: &Self::Literal) -> AlgomotionResult<Self::Style>;

    /// The style a raw value denotes, if it is already a valid style.
    fn style_from_raw(raw: &RawValue) -> Option<Self::Style>;

    /// Default style of truthy values under binary interpretation.
    fn default_true() -> Option<Self::Style>;

    /// Default style of falsy and unmapped values. `None` means "unstyled".
    fn default_false() -> Option<Self::Style> {
        None
    }

    /// Whether purely numeric value sets map through a continuous palette.
    /// Domains without one fall through to identity/group guessing instead.
    fn supports_spectral() -> bool {
        false
    }

    /// A generated palette of `n` distinct styles for group interpretation.
    fn discrete_palette(n: usize) -> AlgomotionResult<Vec<Self::Style>>;

    /// Resolves a continuous-palette point, `t` already clamped to [0, 1].
    fn continuous(t: f64) -> Option<Self::Style> {
        let _ = t;
        None
    }

    fn to_value(style: &Self::Style) -> StyleValue;
}
