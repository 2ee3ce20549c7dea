pub mod pagination;
pub mod validate;

pub use pagination::{Page, PageQuery};
