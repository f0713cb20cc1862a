use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::Activity;

/// Activity name -> record. Ordered so listings come out in name order.
pub type Activities = BTreeMap<String, Activity>;

/// In-memory activity directory shared by every request handler.
///
/// Cloning is cheap and every clone sees the same state. Reads take the
/// shared lock; each mutation holds the exclusive lock for its whole
/// check-then-write step.
#[derive(Clone, Debug, Default)]
pub struct ActivityDirectory {
    inner: Arc<RwLock<Activities>>,
}

impl ActivityDirectory {
    pub fn new(activities: Activities) -> Self {
        Self {
            inner: Arc::new(RwLock::new(activities)),
        }
    }

    /// Snapshot of every activity and its current participants.
    pub async fn list_activities(&self) -> Activities {
        self.inner.read().await.clone()
    }

    #[cfg(test)]
    pub async fn get_activity(&self, activity_name: &str) -> Option<Activity> {
        self.inner.read().await.get(activity_name).cloned()
    }

    /// Runs `apply` against the named activity under the write lock.
    ///
    /// Returns `None` when no activity has that exact name. `apply` must leave
    /// the record untouched when it returns `Err`.
    pub async fn update_activity<T, E>(
        &self,
        activity_name: &str,
        apply: impl FnOnce(&mut Activity) -> Result<T, E>,
    ) -> Option<Result<T, E>> {
        let mut activities = self.inner.write().await;
        let activity = activities.get_mut(activity_name)?;
        Some(apply(activity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> ActivityDirectory {
        let mut activities = Activities::new();
        activities.insert(
            "Chess Club".to_string(),
            Activity {
                description: "Chess".to_string(),
                schedule: "Fridays".to_string(),
                max_participants: 4,
                participants: vec!["michael@mergington.edu".to_string()],
            },
        );
        ActivityDirectory::new(activities)
    }

    #[tokio::test]
    async fn update_unknown_activity_returns_none() {
        let dir = directory();
        let res = dir
            .update_activity("chess club", |_| Ok::<_, ()>(()))
            .await;
        assert!(res.is_none());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let dir = directory();
        let other = dir.clone();
        other
            .update_activity("Chess Club", |a| {
                a.participants.push("new@mergington.edu".to_string());
                Ok::<_, ()>(())
            })
            .await
            .unwrap()
            .unwrap();

        let chess = dir.get_activity("Chess Club").await.unwrap();
        assert_eq!(
            chess.participants,
            vec!["michael@mergington.edu", "new@mergington.edu"]
        );
    }

    #[tokio::test]
    async fn listing_is_a_snapshot() {
        let dir = directory();
        let before = dir.list_activities().await;
        dir.update_activity("Chess Club", |a| {
            a.participants.clear();
            Ok::<_, ()>(())
        })
        .await;
        assert_eq!(before["Chess Club"].participants.len(), 1);
        assert!(dir.list_activities().await["Chess Club"]
            .participants
            .is_empty());
    }
}
