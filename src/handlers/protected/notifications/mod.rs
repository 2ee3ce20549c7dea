pub mod list;
pub mod read;
pub mod realtime;

pub use list::get as list_get;
pub use read::put as read_put;
pub use read::patch as read_all_patch;
pub use read::unread_count_get;
pub use realtime::get as realtime_get;
