//! Collection names of the coterie data model.

/// User profile documents, keyed by user id.
pub const USERS: &str = "users";
/// Timeline posts.
pub const POSTS: &str = "posts";
/// Comments on posts.
pub const COMMENTS: &str = "comments";
/// Posts inside groups.
pub const GROUP_POSTS: &str = "groupPosts";
/// Likes on posts and comments.
pub const LIKES: &str = "likes";
/// Notification feed entries.
pub const NOTIFICATIONS: &str = "notifications";
/// Direct messages.
pub const MESSAGES: &str = "messages";
/// Presence/status updates.
pub const USER_STATUS: &str = "userStatus";
/// Group documents with a `members` array of user ids.
pub const GROUPS: &str = "groups";
/// Friend relationships.
pub const FRIENDS: &str = "friends";
/// Pending friend requests.
pub const FRIEND_REQUESTS: &str = "friendRequests";
/// Append-only audit trail of admin operations.
pub const ADMIN_LOGS: &str = "adminLogs";

/// Back-reference field that dependent records carry.
pub const USER_ID_FIELD: &str = "userId";
/// Membership array on group documents.
pub const MEMBERS_FIELD: &str = "members";

/// The collections swept by `userId` equality when a user is deleted.
///
/// `groups` is deliberately not here: membership lives in an array field
/// and is pruned by a separate pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependentCollection {
    /// Timeline posts.
    Posts,
    /// Comments on posts.
    Comments,
    /// Posts inside groups.
    GroupPosts,
    /// Likes on posts and comments.
    Likes,
    /// Notification feed entries.
    Notifications,
    /// Direct messages.
    Messages,
    /// Presence/status updates.
    UserStatus,
    /// Friend relationships.
    Friends,
    /// Pending friend requests.
    FriendRequests,
}

impl DependentCollection {
    /// Every swept collection, in audit-summary order.
    pub const ALL: [Self; 9] = [
        Self::Posts,
        Self::Comments,
        Self::GroupPosts,
        Self::Likes,
        Self::Notifications,
        Self::Messages,
        Self::UserStatus,
        Self::Friends,
        Self::FriendRequests,
    ];

    /// The collection name in the store.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Posts => POSTS,
            Self::Comments => COMMENTS,
            Self::GroupPosts => GROUP_POSTS,
            Self::Likes => LIKES,
            Self::Notifications => NOTIFICATIONS,
            Self::Messages => MESSAGES,
            Self::UserStatus => USER_STATUS,
            Self::Friends => FRIENDS,
            Self::FriendRequests => FRIEND_REQUESTS,
        }
    }
}
