mod health_check;
mod listing;

pub use health_check::*;
pub use listing::*;
