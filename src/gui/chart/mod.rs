pub mod model;
pub mod view;

pub use model::ChartState;
pub use view::draw;
