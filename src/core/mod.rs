pub mod continuous;
pub mod ordinal;
pub mod primitives;
pub mod scale;
pub mod ticks;
pub mod types;

pub use continuous::{LinearScale, LogScale};
pub use ordinal::{OrdinalLayout, OrdinalScale};
pub use scale::{Scale, ScaleDomain, ScaleKind, ScaleOptions, ScaleSnapshot, make_scale};
pub use types::{AxisValue, Dataset, Row, Viewport};
