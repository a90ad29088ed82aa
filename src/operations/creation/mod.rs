mod make_face;
mod make_grid;

pub use make_face::MakeFace;
pub use make_grid::MakeGrid;
