pub mod pair;
pub mod percentage;
pub mod price;

pub use pair::Pair;
pub use percentage::Percentage;
pub use price::Price;
