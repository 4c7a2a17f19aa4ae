pub mod events;
pub mod highlight;
pub mod palette;
pub mod timer;

pub use events::{Emphasis, HighlightEvent, HighlightRequest, HighlightSink, Origin};
pub use highlight::{HighlightMachine, HighlightState};
pub use palette::{LinkColors, Paint, Palette, Rgb};
pub use timer::{AutoCycleTimer, AUTO_CYCLE_INTERVAL};
