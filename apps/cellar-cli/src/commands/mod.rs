mod price;
mod units;

pub use price::Price;
pub use units::Units;
