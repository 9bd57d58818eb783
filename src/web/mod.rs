pub mod handlers;
pub mod page;

pub use handlers::*;
pub use page::{PageError, PageRenderer};
