mod edge_lengths;
mod is_flipped;
mod texel_density;

pub use edge_lengths::{edge_lengths, EdgeLengthPair, EdgeLengths};
pub use is_flipped::{is_flipped, IsFlipped};
pub use texel_density::{texel_density, FaceTexelDensity};
