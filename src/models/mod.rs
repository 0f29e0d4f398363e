pub mod chart;
pub mod response;
pub mod series;
pub mod stock;

pub use chart::*;
pub use response::*;
pub use series::*;
pub use stock::*;
