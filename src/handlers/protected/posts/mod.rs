pub mod comments;
pub mod create;
pub mod feed;
pub mod like;
pub mod record;

// Re-export handler functions for use in routing
pub use create::post as post_create;
pub use feed::get as feed_get;

pub use record::get as record_get;
pub use record::put as record_put;
pub use record::delete as record_delete;

pub use like::post as like_post;
pub use like::delete as like_delete;

pub use comments::post as comment_post;
pub use comments::get as comments_get;
