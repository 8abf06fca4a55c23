//! JSON snapshot store for forumctl
//!
//! Keeps users, forums, topics and replies in a single JSON document. Every
//! accepted mutation is written back atomically (temp file + rename) so a
//! crashed invocation never leaves a half-written snapshot behind.

use forumctl_core::{
    ForumError, ForumResult, ForumRole, ForumStore, TopicQuery, TopicRecord, UserRecord,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

const STATUS_PUBLISH: &str = "publish";
const STATUS_SPAM: &str = "spam";

/// A stored user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUser {
    pub id: u64,
    pub login: String,
    pub display_name: String,
    #[serde(default = "default_role")]
    pub role: ForumRole,
    #[serde(default)]
    pub spam: bool,
}

/// A stored forum and its moderators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredForum {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub moderators: Vec<u64>,
}

/// A stored topic with its relationship sets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTopic {
    pub id: u64,
    pub forum_id: u64,
    pub title: String,
    pub slug: String,
    pub author_id: u64,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub favoriters: Vec<u64>,
    #[serde(default)]
    pub engagements: Vec<u64>,
}

impl StoredTopic {
    fn to_record(&self) -> TopicRecord {
        TopicRecord {
            id: self.id,
            title: self.title.clone(),
            author_id: self.author_id,
            status: self.status.clone(),
        }
    }
}

/// A stored reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredReply {
    pub id: u64,
    pub topic_id: u64,
    pub author_id: u64,
    #[serde(default = "default_status")]
    pub status: String,
}

/// Whole-store document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub users: Vec<StoredUser>,
    #[serde(default)]
    pub forums: Vec<StoredForum>,
    #[serde(default)]
    pub topics: Vec<StoredTopic>,
    #[serde(default)]
    pub replies: Vec<StoredReply>,
}

fn default_role() -> ForumRole {
    ForumRole::Participant
}

fn default_status() -> String {
    STATUS_PUBLISH.to_string()
}

impl Snapshot {
    fn user(&self, id: u64) -> Option<&StoredUser> {
        self.users.iter().find(|u| u.id == id)
    }

    fn topic(&self, id: u64) -> Option<&StoredTopic> {
        self.topics.iter().find(|t| t.id == id)
    }

    fn topic_mut(&mut self, id: u64) -> Option<&mut StoredTopic> {
        self.topics.iter_mut().find(|t| t.id == id)
    }

    fn forum_mut(&mut self, id: u64) -> Option<&mut StoredForum> {
        self.forums.iter_mut().find(|f| f.id == id)
    }

    fn topics_where<F>(&self, query: &TopicQuery, pred: F) -> Vec<TopicRecord>
    where
        F: Fn(&StoredTopic) -> bool,
    {
        let matching = self.topics.iter().filter(|t| pred(t)).map(StoredTopic::to_record);
        match query.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        }
    }

    /// Flip the spam state of a user and everything they authored
    fn set_spam(&mut self, user_id: u64, spam: bool) -> bool {
        let Some(user) = self.users.iter_mut().find(|u| u.id == user_id) else {
            return false;
        };
        user.spam = spam;

        let (from, to) = if spam {
            (STATUS_PUBLISH, STATUS_SPAM)
        } else {
            (STATUS_SPAM, STATUS_PUBLISH)
        };

        for topic in self.topics.iter_mut().filter(|t| t.author_id == user_id) {
            if topic.status == from {
                topic.status = to.to_string();
            }
        }
        for reply in self.replies.iter_mut().filter(|r| r.author_id == user_id) {
            if reply.status == from {
                reply.status = to.to_string();
            }
        }

        true
    }
}

fn insert_unique(set: &mut Vec<u64>, id: u64) -> bool {
    if set.contains(&id) {
        false
    } else {
        set.push(id);
        true
    }
}

fn remove_present(set: &mut Vec<u64>, id: u64) -> bool {
    let before = set.len();
    set.retain(|existing| *existing != id);
    set.len() != before
}

/// ForumStore backed by a JSON snapshot on disk
pub struct JsonForumStore {
    path: PathBuf,
    site_url: String,
    snapshot: Mutex<Snapshot>,
}

impl JsonForumStore {
    /// Open a store; a missing file is treated as an empty snapshot
    pub fn open(path: impl Into<PathBuf>, site_url: impl Into<String>) -> ForumResult<Self> {
        let path = path.into();
        let snapshot = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content).map_err(|e| {
                ForumError::Serialization(format!(
                    "Failed to parse store {}: {}",
                    path.display(),
                    e
                ))
            })?
        } else {
            debug!("store {} does not exist yet, starting empty", path.display());
            Snapshot::default()
        };

        Ok(Self::with_snapshot(path, site_url, snapshot))
    }

    /// Build a store around an in-memory snapshot, persisting to `path`
    pub fn with_snapshot(
        path: impl Into<PathBuf>,
        site_url: impl Into<String>,
        snapshot: Snapshot,
    ) -> Self {
        Self {
            path: path.into(),
            site_url: site_url.into().trim_end_matches('/').to_string(),
            snapshot: Mutex::new(snapshot),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the current snapshot
    pub fn snapshot(&self) -> ForumResult<Snapshot> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> ForumResult<MutexGuard<'_, Snapshot>> {
        self.snapshot
            .lock()
            .map_err(|_| ForumError::Store("store lock poisoned".to_string()))
    }

    fn read<T>(&self, f: impl FnOnce(&Snapshot) -> T) -> ForumResult<T> {
        let snapshot = self.lock()?;
        Ok(f(&snapshot))
    }

    /// Apply a mutation and persist it when the mutation reports a change
    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut Snapshot) -> T,
        changed: impl FnOnce(&T) -> bool,
    ) -> ForumResult<T> {
        let mut snapshot = self.lock()?;
        let result = f(&mut snapshot);
        if changed(&result) {
            self.persist(&snapshot)?;
        }
        Ok(result)
    }

    fn persist(&self, snapshot: &Snapshot) -> ForumResult<()> {
        let json = serde_json::to_string_pretty(snapshot).map_err(|e| {
            ForumError::Serialization(format!("Failed to serialize store: {}", e))
        })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        debug!("persisted store to {}", self.path.display());
        Ok(())
    }
}

impl ForumStore for JsonForumStore {
    fn lookup_user_by_id(&self, id: u64) -> ForumResult<Option<UserRecord>> {
        self.read(|s| {
            s.user(id)
                .map(|u| UserRecord::new(u.id, u.login.clone(), u.display_name.clone()))
        })
    }

    fn lookup_user_by_login(&self, login: &str) -> ForumResult<Option<UserRecord>> {
        self.read(|s| {
            s.users
                .iter()
                .find(|u| u.login == login)
                .map(|u| UserRecord::new(u.id, u.login.clone(), u.display_name.clone()))
        })
    }

    fn topic_exists(&self, topic_id: u64) -> ForumResult<bool> {
        self.read(|s| s.topic(topic_id).is_some())
    }

    fn forum_exists(&self, forum_id: u64) -> ForumResult<bool> {
        self.read(|s| s.forums.iter().any(|f| f.id == forum_id))
    }

    fn add_favorite(&self, user_id: u64, topic_id: u64) -> ForumResult<bool> {
        self.mutate(
            |s| {
                s.topic_mut(topic_id)
                    .map(|t| insert_unique(&mut t.favoriters, user_id))
                    .unwrap_or(false)
            },
            |added| *added,
        )
    }

    fn remove_favorite(&self, user_id: u64, topic_id: u64) -> ForumResult<bool> {
        self.mutate(
            |s| {
                s.topic_mut(topic_id)
                    .map(|t| remove_present(&mut t.favoriters, user_id))
                    .unwrap_or(false)
            },
            |removed| *removed,
        )
    }

    fn favoriters_of(&self, topic_id: u64) -> ForumResult<Vec<u64>> {
        self.read(|s| {
            s.topic(topic_id)
                .map(|t| t.favoriters.clone())
                .unwrap_or_default()
        })
    }

    fn favorites_of(&self, user_id: u64, query: &TopicQuery) -> ForumResult<Vec<TopicRecord>> {
        self.read(|s| s.topics_where(query, |t| t.favoriters.contains(&user_id)))
    }

    fn add_engagement(&self, user_id: u64, topic_id: u64) -> ForumResult<bool> {
        self.mutate(
            |s| {
                s.topic_mut(topic_id)
                    .map(|t| insert_unique(&mut t.engagements, user_id))
                    .unwrap_or(false)
            },
            |added| *added,
        )
    }

    fn remove_engagement(&self, user_id: u64, topic_id: u64) -> ForumResult<bool> {
        self.mutate(
            |s| {
                s.topic_mut(topic_id)
                    .map(|t| remove_present(&mut t.engagements, user_id))
                    .unwrap_or(false)
            },
            |removed| *removed,
        )
    }

    fn engagements_of_topic(&self, topic_id: u64) -> ForumResult<Vec<u64>> {
        self.read(|s| {
            s.topic(topic_id)
                .map(|t| t.engagements.clone())
                .unwrap_or_default()
        })
    }

    fn engagements_of_user(
        &self,
        user_id: u64,
        query: &TopicQuery,
    ) -> ForumResult<Vec<TopicRecord>> {
        self.read(|s| s.topics_where(query, |t| t.engagements.contains(&user_id)))
    }

    fn recalculate_engagements(&self, topic_id: u64) -> ForumResult<bool> {
        self.mutate(
            |s| {
                let Some(author_id) = s.topic(topic_id).map(|t| t.author_id) else {
                    return false;
                };

                let mut engaged = vec![author_id];
                for reply in s.replies.iter().filter(|r| r.topic_id == topic_id) {
                    insert_unique(&mut engaged, reply.author_id);
                }

                if let Some(topic) = s.topic_mut(topic_id) {
                    info!(
                        "topic {} engagements recalculated: {} users",
                        topic_id,
                        engaged.len()
                    );
                    topic.engagements = engaged;
                }
                true
            },
            |recalculated| *recalculated,
        )
    }

    fn add_moderator(&self, forum_id: u64, user_id: u64) -> ForumResult<bool> {
        self.mutate(
            |s| {
                s.forum_mut(forum_id)
                    .map(|f| insert_unique(&mut f.moderators, user_id))
                    .unwrap_or(false)
            },
            |added| *added,
        )
    }

    fn remove_moderator(&self, forum_id: u64, user_id: u64) -> ForumResult<bool> {
        self.mutate(
            |s| {
                s.forum_mut(forum_id)
                    .map(|f| remove_present(&mut f.moderators, user_id))
                    .unwrap_or(false)
            },
            |removed| *removed,
        )
    }

    fn moderators_of(&self, forum_id: u64) -> ForumResult<Vec<UserRecord>> {
        self.read(|s| {
            let Some(forum) = s.forums.iter().find(|f| f.id == forum_id) else {
                return Vec::new();
            };
            forum
                .moderators
                .iter()
                .filter_map(|id| s.user(*id))
                .map(|u| UserRecord::new(u.id, u.login.clone(), u.display_name.clone()))
                .collect()
        })
    }

    fn moderator_ids_of(&self, forum_id: u64) -> ForumResult<Vec<u64>> {
        self.read(|s| {
            s.forums
                .iter()
                .find(|f| f.id == forum_id)
                .map(|f| f.moderators.clone())
                .unwrap_or_default()
        })
    }

    fn mark_spam(&self, user_id: u64) -> ForumResult<bool> {
        self.mutate(|s| s.set_spam(user_id, true), |marked| *marked)
    }

    fn mark_ham(&self, user_id: u64) -> ForumResult<bool> {
        self.mutate(|s| s.set_spam(user_id, false), |marked| *marked)
    }

    fn set_role(&self, user_id: u64, role: ForumRole) -> ForumResult<Option<String>> {
        self.mutate(
            |s| {
                let user = s.users.iter_mut().find(|u| u.id == user_id)?;
                user.role = role;
                Some(role.as_str().to_string())
            },
            |applied| applied.is_some(),
        )
    }

    fn profile_url(&self, user_id: u64) -> ForumResult<Option<String>> {
        let base = self.site_url.clone();
        self.read(|s| {
            s.user(user_id)
                .map(|u| format!("{}/forums/users/{}/", base, u.login))
        })
    }

    fn topic_url(&self, topic_id: u64) -> ForumResult<Option<String>> {
        let base = self.site_url.clone();
        self.read(|s| {
            s.topic(topic_id)
                .map(|t| format!("{}/forums/topic/{}/", base, t.slug))
        })
    }
}
