pub mod coordinate;
pub mod highlight;
pub mod word;

pub use coordinate::CoordinateMapper;
pub use highlight::{HighlightController, HighlightMode};
pub use word::WordLocator;
