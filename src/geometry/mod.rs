pub mod normalize;
pub mod rect;
