#![forbid(unsafe_code)]

pub mod component;
pub mod engine;
pub mod error;
pub mod frame;
pub mod graph;
pub mod palette;
pub mod raw;
pub mod style;
pub mod stylizer;
pub mod tick;
pub mod ticker;

pub use component::GraphComponent;
pub use engine::{EdgeSource, Engine, GraphHandle, NodeSource};
pub use error::{AlgomotionError, AlgomotionResult};
pub use frame::{ComponentFrame, Frame};
pub use graph::{AttrMap, Edges, ElementKind, NodeId, Nodes, VisualGraph};
pub use raw::RawValue;
pub use style::{Color, Shape, StyleDomain, StyleValue};
pub use stylizer::{Interpretation, RawMap, Source, StyleConfig, StyleMap, Stylizer};
pub use tick::{Tick, TickSource, TransformedState};
pub use ticker::Ticker;
