pub mod comment;
pub mod notification;
pub mod post;
pub mod user;

pub use comment::{CommentRow, CommentView};
pub use notification::{Notification, NotificationRow, NotificationType, NotificationView};
pub use post::{PostOwner, PostRow, PostSummary, PostView};
pub use user::{User, UserProfile, UserSummary};
