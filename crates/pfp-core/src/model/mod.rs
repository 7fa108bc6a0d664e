mod detail;
mod search;


pub use detail::*;
pub use search::*;
