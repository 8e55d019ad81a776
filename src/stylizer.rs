use std::collections::{BTreeMap, BTreeSet};

use crate::error::{AlgomotionError, AlgomotionResult};
use crate::graph::{ElementKind, VisualGraph};
use crate::raw::RawValue;
use crate::style::{StyleDomain, StyleValue};

/// Raw per-element values captured by the transform phase, keyed by the
/// element's string form. `None` entries are elements whose source produced
/// no value.
pub type RawMap = BTreeMap<String, Option<RawValue>>;

/// Final per-element styles, in the common frame-facing representation.
pub type StyleMap = BTreeMap<String, Option<StyleValue>>;

/// Where a stylizer's raw values come from.
pub enum Source<E: ElementKind> {
    /// A user-supplied per-element function.
    Fn(Box<dyn Fn(&E::Key, &VisualGraph) -> Option<RawValue>>),
    /// Read the named attribute off each element; missing attribute is null.
    Prop(String),
    /// Membership shorthand: element in the set maps to `true`.
    Members(BTreeSet<E::Key>),
}

impl<E: ElementKind> Source<E> {
    pub fn func(f: impl Fn(&E::Key, &VisualGraph) -> Option<RawValue> + 'static) -> Self {
        Self::Fn(Box::new(f))
    }

    pub fn prop(name: impl Into<String>) -> Self {
        Self::Prop(name.into())
    }

    pub fn members(keys: impl IntoIterator<Item = E::Key>) -> Self {
        Self::Members(keys.into_iter().collect())
    }

    fn eval(&self, key: &E::Key, graph: &VisualGraph) -> Option<RawValue> {
        match self {
            Self::Fn(f) => f(key, graph),
            Self::Prop(name) => E::attr(graph, key, name),
            Self::Members(set) => Some(RawValue::Bool(set.contains(key))),
        }
    }
}

/// User-facing style configuration. The variant shape decides the
/// interpretation ahead of guessing; `None` requests guessing.
#[derive(Clone, Debug, Default)]
pub enum StyleConfig<L> {
    #[default]
    None,
    /// Generate a palette of this many styles.
    Count(usize),
    /// One style for truthy values.
    Single(L),
    /// Explicit group styles, assigned to sorted distinct values.
    List(Vec<L>),
    /// Exact value-to-style mapping.
    Map(Vec<(RawValue, L)>),
}

impl<L> StyleConfig<L> {
    fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

// Config after eager literal validation.
enum ParsedConfig<S> {
    Count(usize),
    Single(S),
    List(Vec<S>),
    Map(BTreeMap<RawValue, S>),
}

/// The strategy chosen (or guessed) for turning raw values into styles.
/// Computed exactly once per run, after all ticks are collected.
#[derive(Clone, Debug, PartialEq)]
pub enum Interpretation<S> {
    Binary {
        true_style: Option<S>,
        false_style: Option<S>,
    },
    Group {
        style_of: BTreeMap<RawValue, S>,
    },
    Identity,
    Spectral {
        lower: f64,
        upper: f64,
    },
}

/// The per-visual-property engine: transform raw values out of the graph
/// while the run executes, interpret the observed value set once the run
/// ends, then compute final styles during frame construction.
pub struct Stylizer<E: ElementKind, D: StyleDomain> {
    source: Source<E>,
    config: Option<ParsedConfig<D::Style>>,
    range: Option<(f64, f64)>,
    unique_values: BTreeSet<RawValue>,
    interpretation: Option<Interpretation<D::Style>>,
}

impl<E: ElementKind, D: StyleDomain> std::fmt::Debug for Stylizer<E, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stylizer").finish_non_exhaustive()
    }
}

impl<E: ElementKind, D: StyleDomain> Stylizer<E, D> {
    /// Builds a stylizer, validating all configuration eagerly: style
    /// literals must parse, the numeric range must be an ordered finite
    /// pair, and style configuration is mutually exclusive with a range.
    pub fn new(
        source: Source<E>,
        config: StyleConfig<D::Literal>,
        range: Option<(f64, f64)>,
    ) -> AlgomotionResult<Self> {
        if let Some((lower, upper)) = range {
            if !lower.is_finite() || !upper.is_finite() || lower >= upper {
                return Err(AlgomotionError::invalid_range(format!(
                    "({lower}, {upper}) is not an ordered pair of finite numbers"
                )));
            }
            if !config.is_none() {
                return Err(AlgomotionError::config_conflict(
                    "style configuration and a numeric range are mutually exclusive",
                ));
            }
        }

        let config = match config {
            StyleConfig::None => None,
            StyleConfig::Count(0) => {
                return Err(AlgomotionError::invalid_style(
                    "style count must be greater than zero",
                ));
            }
            StyleConfig::Count(n) => Some(ParsedConfig::Count(n)),
            StyleConfig::Single(literal) => Some(ParsedConfig::Single(D::parse_literal(&literal)?)),
            StyleConfig::List(literals) => {
                if literals.is_empty() {
                    return Err(AlgomotionError::invalid_style("style list must be non-empty"));
                }
                let styles = literals
                    .iter()
                    .map(|l| D::parse_literal(l))
                    .collect::<AlgomotionResult<Vec<_>>>()?;
                Some(ParsedConfig::List(styles))
            }
            StyleConfig::Map(entries) => {
                if entries.is_empty() {
                    return Err(AlgomotionError::invalid_style("style map must be non-empty"));
                }
                let mut style_of = BTreeMap::new();
                for (value, literal) in &entries {
                    style_of.insert(value.clone(), D::parse_literal(literal)?);
                }
                Some(ParsedConfig::Map(style_of))
            }
        };

        Ok(Self {
            source,
            config,
            range,
            unique_values: BTreeSet::new(),
            interpretation: None,
        })
    }

    /// Runs the source over every element of the graph, recording each
    /// non-null value into the unique-value accumulator. O(elements); called
    /// once per tick.
    pub fn transform(&mut self, graph: &VisualGraph) -> RawMap {
        let mut out = RawMap::new();
        for key in E::keys(graph) {
            let value = self.source.eval(&key, graph);
            if let Some(v) = &value {
                self.unique_values.insert(v.clone());
            }
            out.insert(E::key_string(&key), value);
        }
        out
    }

    /// Chooses the interpretation, exactly once, after the run ends. With an
    /// explicit configuration the config shape decides; otherwise the
    /// accumulated unique-value set is classified.
    pub fn interpret(&mut self) -> AlgomotionResult<()> {
        if self.interpretation.is_some() {
            return Ok(());
        }

        let interpretation = match self.config.take() {
            None => self.guess()?,
            Some(ParsedConfig::Count(1)) => Interpretation::Binary {
                true_style: D::default_true(),
                false_style: D::default_false(),
            },
            Some(ParsedConfig::Count(n)) => self.group_from_list(D::discrete_palette(n)?)?,
            Some(ParsedConfig::Single(style)) => Interpretation::Binary {
                true_style: Some(style),
                false_style: D::default_false(),
            },
            Some(ParsedConfig::List(styles)) if styles.len() == 1 => Interpretation::Binary {
                true_style: styles.into_iter().next(),
                false_style: D::default_false(),
            },
            Some(ParsedConfig::List(styles)) => self.group_from_list(styles)?,
            Some(ParsedConfig::Map(style_of)) => Interpretation::Group { style_of },
        };

        tracing::debug!(
            property = D::PROPERTY,
            kind = interpretation_kind(&interpretation),
            "interpreted"
        );
        self.interpretation = Some(interpretation);
        Ok(())
    }

    // Assigns an ordered style list to the sorted distinct values. Too few
    // styles is fatal, except exactly two styles fall back to binary.
    fn group_from_list(
        &self,
        styles: Vec<D::Style>,
    ) -> AlgomotionResult<Interpretation<D::Style>> {
        let uniq = &self.unique_values;

        if styles.len() < uniq.len() {
            if styles.len() == 2 {
                let mut it = styles.into_iter();
                return Ok(Interpretation::Binary {
                    true_style: it.next(),
                    false_style: it.next(),
                });
            }
            return Err(AlgomotionError::too_few_styles(format!(
                "{} styles for {} distinct values of {}",
                styles.len(),
                uniq.len(),
                D::PROPERTY
            )));
        }

        let style_of = uniq.iter().cloned().zip(styles).collect();
        Ok(Interpretation::Group { style_of })
    }

    // Classifies the unique-value set when no configuration was given.
    fn guess(&self) -> AlgomotionResult<Interpretation<D::Style>> {
        let uniq = &self.unique_values;

        let only_booleans = uniq.iter().all(|v| matches!(v, RawValue::Bool(_)));
        if only_booleans {
            return Ok(Interpretation::Binary {
                true_style: D::default_true(),
                false_style: D::default_false(),
            });
        }

        let all_numeric = uniq.iter().all(RawValue::is_numeric);
        let any_float = uniq.iter().any(RawValue::is_float);
        if all_numeric && any_float && D::supports_spectral() {
            let (lower, upper) = self.range.unwrap_or_else(|| self.observed_bounds());
            return Ok(Interpretation::Spectral { lower, upper });
        }

        if uniq.iter().all(|v| D::style_from_raw(v).is_some()) {
            return Ok(Interpretation::Identity);
        }

        self.group_from_list(D::discrete_palette(uniq.len())?)
    }

    fn observed_bounds(&self) -> (f64, f64) {
        let numeric: Vec<f64> = self.unique_values.iter().filter_map(RawValue::as_f64).collect();
        match (
            numeric.iter().copied().reduce(f64::min),
            numeric.iter().copied().reduce(f64::max),
        ) {
            (Some(lower), Some(upper)) => (lower, upper),
            _ => (f64::NEG_INFINITY, f64::INFINITY),
        }
    }

    /// Computes the style of one raw value. Null in, null out — always.
    pub fn compute_single(&self, value: Option<&RawValue>) -> Option<D::Style> {
        let value = value?;
        let interpretation = self.interpretation.as_ref()?;

        match interpretation {
            Interpretation::Binary {
                true_style,
                false_style,
            } => {
                if value.as_bool() {
                    true_style.clone()
                } else {
                    false_style.clone()
                }
            }
            Interpretation::Group { style_of } => {
                style_of.get(value).cloned().or_else(D::default_false)
            }
            Interpretation::Identity => D::style_from_raw(value),
            Interpretation::Spectral { lower, upper } => {
                // Classification was global; an individual malformed value
                // degrades to the default style instead of failing.
                let Some(x) = value.as_f64() else {
                    return D::default_false();
                };
                let span = upper - lower;
                let point = if span.is_finite() && span > 0.0 {
                    ((x - lower) / span).clamp(0.0, 1.0)
                } else {
                    0.5
                };
                D::continuous(point)
            }
        }
    }

    /// Computes styles for a whole transformed map. A null transformed state
    /// propagates to a null style map.
    pub fn compute(&self, state: Option<&RawMap>) -> Option<StyleMap> {
        let state = state?;
        Some(
            state
                .iter()
                .map(|(key, value)| {
                    let style = self.compute_single(value.as_ref());
                    (key.clone(), style.as_ref().map(|s| D::to_value(s)))
                })
                .collect(),
        )
    }

    pub fn interpretation(&self) -> Option<&Interpretation<D::Style>> {
        self.interpretation.as_ref()
    }

    pub fn observed_values(&self) -> &BTreeSet<RawValue> {
        &self.unique_values
    }

    pub fn has_interpretation(&self) -> bool {
        self.interpretation.is_some()
    }

    pub fn has_binary_interpretation(&self) -> bool {
        matches!(self.interpretation, Some(Interpretation::Binary { .. }))
    }

    pub fn has_group_interpretation(&self) -> bool {
        matches!(self.interpretation, Some(Interpretation::Group { .. }))
    }

    pub fn has_identity_interpretation(&self) -> bool {
        matches!(self.interpretation, Some(Interpretation::Identity))
    }

    pub fn has_spectral_interpretation(&self) -> bool {
        matches!(self.interpretation, Some(Interpretation::Spectral { .. }))
    }
}

fn interpretation_kind<S>(interpretation: &Interpretation<S>) -> &'static str {
    match interpretation {
        Interpretation::Binary { .. } => "binary",
        Interpretation::Group { .. } => "group",
        Interpretation::Identity => "identity",
        Interpretation::Spectral { .. } => "spectral",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Nodes;
    use crate::style::domains::{NodeColor, NodeShapeStyle};

    type NodeColorizer = Stylizer<Nodes, NodeColor>;

    fn layer_graph(values: &[i64]) -> VisualGraph {
        let mut g = VisualGraph::new();
        for (i, v) in values.iter().enumerate() {
            let id = format!("n{i}");
            g.add_node(id.clone());
            g.set_node_attr(id, "layer", *v);
        }
        g
    }

    fn colorizer(config: StyleConfig<String>) -> NodeColorizer {
        Stylizer::new(Source::prop("layer"), config, None).unwrap()
    }

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn construction_rejects_conflicts_and_bad_literals() {
        let err = Stylizer::<Nodes, NodeColor>::new(
            Source::prop("x"),
            StyleConfig::Single("red".to_string()),
            Some((0.0, 1.0)),
        )
        .unwrap_err();
        assert!(matches!(err, AlgomotionError::ConfigConflict(_)));

        let err = Stylizer::<Nodes, NodeColor>::new(
            Source::prop("x"),
            StyleConfig::Single("not-a-color".to_string()),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, AlgomotionError::InvalidStyle(_)));

        let err =
            Stylizer::<Nodes, NodeColor>::new(Source::prop("x"), StyleConfig::<String>::None, Some((2.0, 1.0)))
                .unwrap_err();
        assert!(matches!(err, AlgomotionError::InvalidRange(_)));

        let err = Stylizer::<Nodes, NodeColor>::new(
            Source::prop("x"),
            StyleConfig::<String>::Count(0),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, AlgomotionError::InvalidStyle(_)));
    }

    #[test]
    fn null_propagates_through_compute() {
        let mut s = colorizer(StyleConfig::None);
        s.interpret().unwrap();
        assert_eq!(s.compute_single(None), None);
        assert_eq!(s.compute(None), None);
    }

    #[test]
    fn empty_and_boolean_sets_guess_binary() {
        let mut s = colorizer(StyleConfig::None);
        s.interpret().unwrap();
        assert!(s.has_binary_interpretation());

        let mut s = Stylizer::<Nodes, NodeColor>::new(
            Source::members(["n0".to_string()]),
            StyleConfig::None,
            None,
        )
        .unwrap();
        let g = layer_graph(&[1, 2]);
        s.transform(&g);
        s.interpret().unwrap();
        assert!(s.has_binary_interpretation());

        // Default binary styling: truthy is blue, falsy is unstyled.
        let blue = s.compute_single(Some(&RawValue::Bool(true))).unwrap();
        assert_eq!(blue.to_hex(), "#0000ffff");
        assert_eq!(s.compute_single(Some(&RawValue::Bool(false))), None);
    }

    #[test]
    fn mixed_numeric_set_with_floats_guesses_spectral() {
        let mut g = VisualGraph::new();
        g.set_node_attr("a", "layer", 0i64);
        g.set_node_attr("b", "layer", 0.5);
        g.set_node_attr("c", "layer", 2i64);

        let mut s = colorizer(StyleConfig::None);
        s.transform(&g);
        s.interpret().unwrap();
        assert!(s.has_spectral_interpretation());
        assert_eq!(
            s.interpretation(),
            Some(&Interpretation::Spectral {
                lower: 0.0,
                upper: 2.0
            })
        );

        // Malformed individual value degrades instead of failing.
        assert_eq!(s.compute_single(Some(&RawValue::from("oops"))), None);
        // In-range values resolve through the continuous palette.
        assert!(s.compute_single(Some(&RawValue::Float(1.0))).is_some());
    }

    #[test]
    fn all_integer_set_guesses_group_not_spectral() {
        let g = layer_graph(&[0, 1, 1, 2]);
        let mut s = colorizer(StyleConfig::None);
        s.transform(&g);
        s.interpret().unwrap();

        assert!(s.has_group_interpretation());
        let Some(Interpretation::Group { style_of }) = s.interpretation() else {
            panic!("expected group interpretation");
        };
        assert_eq!(style_of.len(), 3);

        // Stable: the same value computes the same style twice.
        let first = s.compute_single(Some(&RawValue::Int(1)));
        let again = s.compute_single(Some(&RawValue::Int(1)));
        assert!(first.is_some());
        assert_eq!(first, again);
        // Unmapped values miss to the default style.
        assert_eq!(s.compute_single(Some(&RawValue::Int(99))), None);
    }

    #[test]
    fn style_literal_sets_guess_identity() {
        let mut g = VisualGraph::new();
        g.set_node_attr("a", "layer", "red");
        g.set_node_attr("b", "layer", "#00ff00");

        let mut s = colorizer(StyleConfig::None);
        s.transform(&g);
        s.interpret().unwrap();
        assert!(s.has_identity_interpretation());
        assert_eq!(
            s.compute_single(Some(&RawValue::from("red"))).unwrap().to_hex(),
            "#ff0000ff"
        );
    }

    #[test]
    fn guess_is_deterministic_for_a_given_value_set() {
        for _ in 0..3 {
            let g = layer_graph(&[3, 1, 2]);
            let mut s = colorizer(StyleConfig::None);
            s.transform(&g);
            s.interpret().unwrap();
            assert!(s.has_group_interpretation());
        }
    }

    #[test]
    fn two_explicit_styles_fall_back_to_binary() {
        let g = layer_graph(&[0, 1, 2, 3]);
        let mut s = colorizer(StyleConfig::List(strings(&["red", "green"])));
        s.transform(&g);
        s.interpret().unwrap();

        assert!(s.has_binary_interpretation());
        // First listed style is the truthy one.
        let truthy = s.compute_single(Some(&RawValue::Int(3))).unwrap();
        assert_eq!(truthy.to_hex(), "#ff0000ff");
        let falsy = s.compute_single(Some(&RawValue::Int(0))).unwrap();
        assert_eq!(falsy.to_hex(), "#008000ff");
    }

    #[test]
    fn too_few_styles_is_fatal_above_two() {
        let g = layer_graph(&[0, 1, 2, 3]);
        let mut s = colorizer(StyleConfig::List(strings(&["red", "green", "blue"])));
        s.transform(&g);
        let err = s.interpret().unwrap_err();
        assert!(matches!(err, AlgomotionError::TooFewStyles(_)));

        // Same rule for generated palettes.
        let mut s = colorizer(StyleConfig::Count(3));
        s.transform(&layer_graph(&[0, 1, 2, 3]));
        assert!(matches!(
            s.interpret().unwrap_err(),
            AlgomotionError::TooFewStyles(_)
        ));
    }

    #[test]
    fn explicit_list_zips_sorted_values() {
        let g = layer_graph(&[2, 0, 1]);
        let mut s = colorizer(StyleConfig::List(strings(&["red", "green", "blue"])));
        s.transform(&g);
        s.interpret().unwrap();

        assert_eq!(
            s.compute_single(Some(&RawValue::Int(0))).unwrap().to_hex(),
            "#ff0000ff"
        );
        assert_eq!(
            s.compute_single(Some(&RawValue::Int(1))).unwrap().to_hex(),
            "#008000ff"
        );
        assert_eq!(
            s.compute_single(Some(&RawValue::Int(2))).unwrap().to_hex(),
            "#0000ffff"
        );
    }

    #[test]
    fn single_style_is_binary_true_style() {
        let g = layer_graph(&[0, 1]);
        let mut s = colorizer(StyleConfig::Single("tomato".to_string()));
        s.transform(&g);
        s.interpret().unwrap();
        assert!(s.has_binary_interpretation());
        assert!(s.compute_single(Some(&RawValue::Int(1))).is_some());
        assert_eq!(s.compute_single(Some(&RawValue::Int(0))), None);
    }

    #[test]
    fn map_config_is_exact_match_with_default_miss() {
        let mut s = colorizer(StyleConfig::Map(vec![
            (RawValue::from("visited"), "green".to_string()),
            (RawValue::from("frontier"), "orange".to_string()),
        ]));
        s.interpret().unwrap();
        assert!(s.has_group_interpretation());
        assert!(s.compute_single(Some(&RawValue::from("visited"))).is_some());
        assert_eq!(s.compute_single(Some(&RawValue::from("unknown"))), None);
    }

    #[test]
    fn explicit_range_overrides_spectral_bounds() {
        let mut g = VisualGraph::new();
        g.set_node_attr("a", "layer", 0.2);
        g.set_node_attr("b", "layer", 0.8);

        let mut s: NodeColorizer =
            Stylizer::new(Source::prop("layer"), StyleConfig::None, Some((0.0, 10.0))).unwrap();
        s.transform(&g);
        s.interpret().unwrap();
        assert_eq!(
            s.interpretation(),
            Some(&Interpretation::Spectral {
                lower: 0.0,
                upper: 10.0
            })
        );
    }

    #[test]
    fn shapes_never_guess_spectral() {
        let mut g = VisualGraph::new();
        g.set_node_attr("a", "rank", 0.5);
        g.set_node_attr("b", "rank", 1.5);

        let mut s: Stylizer<Nodes, NodeShapeStyle> =
            Stylizer::new(Source::prop("rank"), StyleConfig::None, None).unwrap();
        s.transform(&g);
        s.interpret().unwrap();
        assert!(s.has_group_interpretation());
    }

    #[test]
    fn interpret_runs_once_and_accumulator_is_append_only() {
        let g = layer_graph(&[0, 1]);
        let mut s = colorizer(StyleConfig::None);
        s.transform(&g);
        assert_eq!(s.observed_values().len(), 2);
        s.transform(&g);
        assert_eq!(s.observed_values().len(), 2);

        s.interpret().unwrap();
        let before = s.interpretation().cloned();
        s.interpret().unwrap();
        assert_eq!(s.interpretation(), before.as_ref());
    }
}
