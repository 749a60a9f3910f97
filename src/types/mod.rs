pub mod news;
pub mod price;
pub mod report;
pub mod signals;

pub use news::*;
pub use price::*;
pub use report::*;
pub use signals::*;
