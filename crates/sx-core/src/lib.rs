pub mod color;
pub mod config;
pub mod error;
pub mod id;
pub mod measure;
pub mod model;
pub mod parser;
pub mod scene;
pub mod tree;

pub use color::Color;
pub use config::{LayoutConfig, ParseConfig, Theme};
pub use error::ParseError;
pub use id::{ObjectId, Symbol};
pub use measure::{MonospaceMeasure, TextMeasure};
pub use model::*;
pub use parser::{parse_sexpr, parse_sexpr_with};
pub use scene::{Motion, SceneNode};
pub use tree::{ChildIndex, NodePath, Segment, TreeNode};

// Re-export kurbo geometry so downstream crates share one version
pub use kurbo;
