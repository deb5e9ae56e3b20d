// Re-export all model types
pub use self::cart::*;
pub use self::errors::*;
pub use self::product::*;
pub use self::snapshot::*;

mod cart;
mod errors;
mod product;
mod snapshot;
