pub mod framing;

pub use framing::{compute_framing_position, framing_distance, framing_position_or_default};
