mod fix_flipped;
mod mark_seams;
mod scale_to_density;

pub use fix_flipped::{mirror_uvs, FixFlipped};
pub use mark_seams::MarkSeamsFromIslands;
pub use scale_to_density::ScaleToDensity;
