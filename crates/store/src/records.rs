//! Typed views over stored documents.
//!
//! Documents are schemaless field maps; these records declare the fields a
//! reader actually consumes. Decoding tolerates extra fields and, where a
//! default is declared, missing ones, so drifted documents stay readable.

use serde::{Deserialize, Serialize};

use crate::collections::DependentCollection;

/// The fields of a `users` document the admin service reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Account email, absent on some legacy documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Whether the user may run admin operations.
    #[serde(default)]
    pub is_admin: bool,
}

/// The fields of a `groups` document the admin service reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecord {
    /// Member user ids. Missing on drifted documents, treated as empty.
    #[serde(default)]
    pub members: Vec<String>,
}

/// Per-collection record counts of one completed deletion cascade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionCounts {
    /// Documents removed from `posts`.
    pub posts_deleted: u64,
    /// Documents removed from `comments`.
    pub comments_deleted: u64,
    /// Documents removed from `groupPosts`.
    pub group_posts_deleted: u64,
    /// Documents removed from `likes`.
    pub likes_deleted: u64,
    /// Documents removed from `notifications`.
    pub notifications_deleted: u64,
    /// Documents removed from `messages`.
    pub messages_deleted: u64,
    /// Documents removed from `userStatus`.
    pub status_updates_deleted: u64,
    /// Groups whose member list was pruned.
    pub groups_removed_from: u64,
    /// Documents removed from `friends`.
    pub friend_relationships_deleted: u64,
    /// Documents removed from `friendRequests`.
    pub friend_requests_deleted: u64,
}

impl DeletionCounts {
    /// Record the sweep result for one dependent collection.
    pub const fn set(&mut self, collection: DependentCollection, count: u64) {
        match collection {
            DependentCollection::Posts => self.posts_deleted = count,
            DependentCollection::Comments => self.comments_deleted = count,
            DependentCollection::GroupPosts => self.group_posts_deleted = count,
            DependentCollection::Likes => self.likes_deleted = count,
            DependentCollection::Notifications => self.notifications_deleted = count,
            DependentCollection::Messages => self.messages_deleted = count,
            DependentCollection::UserStatus => self.status_updates_deleted = count,
            DependentCollection::Friends => self.friend_relationships_deleted = count,
            DependentCollection::FriendRequests => self.friend_requests_deleted = count,
        }
    }

    /// The sweep result recorded for one dependent collection.
    #[must_use]
    pub const fn get(&self, collection: DependentCollection) -> u64 {
        match collection {
            DependentCollection::Posts => self.posts_deleted,
            DependentCollection::Comments => self.comments_deleted,
            DependentCollection::GroupPosts => self.group_posts_deleted,
            DependentCollection::Likes => self.likes_deleted,
            DependentCollection::Notifications => self.notifications_deleted,
            DependentCollection::Messages => self.messages_deleted,
            DependentCollection::UserStatus => self.status_updates_deleted,
            DependentCollection::Friends => self.friend_relationships_deleted,
            DependentCollection::FriendRequests => self.friend_requests_deleted,
        }
    }

    /// Total documents removed, including group prunes.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.posts_deleted
            + self.comments_deleted
            + self.group_posts_deleted
            + self.likes_deleted
            + self.notifications_deleted
            + self.messages_deleted
            + self.status_updates_deleted
            + self.groups_removed_from
            + self.friend_relationships_deleted
            + self.friend_requests_deleted
    }
}

/// One audit trail entry, as written to `adminLogs`.
///
/// The store assigns `createdAt` on append; it is not part of the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    /// Operation name, e.g. `deleteUser`.
    pub action: String,
    /// Admin who ran the operation.
    pub admin_uid: String,
    /// Admin email at the time of the operation.
    pub admin_email: Option<String>,
    /// User the operation targeted.
    pub target_user_id: String,
    /// Target email captured before deletion.
    pub target_user_email: Option<String>,
    /// What the cascade removed.
    pub details: DeletionCounts,
}
