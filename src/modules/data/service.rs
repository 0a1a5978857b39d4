use schoolhub_core::AppError;
use schoolhub_models::{BackupBundle, Collection, Role};
use schoolhub_store::{SchoolState, SchoolStore};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

use super::model::{HistoryResponse, ThemeResponse};
use crate::middleware::auth::AuthUser;
use crate::modules::fees::model::FeeRow;

fn to_value<T: Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(AppError::internal)
}

/// One collection as JSON. Messages are limited to the caller's own and
/// parents only get their own children's records.
pub fn collection_value(state: &SchoolState, user: &AuthUser, collection: Collection) -> Result<Value, AppError> {
    let data = &state.data;
    let own_child = |parent: Option<&str>| user.role() != Role::Parent || parent == Some(user.name());
    match collection {
        Collection::Students => to_value(
            &data
                .students
                .iter()
                .filter(|s| own_child(s.parent.as_deref()))
                .collect::<Vec<_>>(),
        ),
        Collection::Fees => to_value(
            &data
                .students
                .iter()
                .filter(|s| own_child(s.parent.as_deref()))
                .map(FeeRow::from)
                .collect::<Vec<_>>(),
        ),
        Collection::Messages => to_value(
            &data
                .messages
                .iter()
                .filter(|m| m.involves(user.username()))
                .collect::<Vec<_>>(),
        ),
        Collection::Teachers => to_value(&data.teachers),
        Collection::Classes => to_value(&data.classes),
        Collection::Announcements => to_value(&data.announcements),
        Collection::Homework => to_value(&data.homework),
        Collection::Events => to_value(&data.events),
        Collection::Library => to_value(&data.library),
        Collection::Transport => to_value(&data.transport),
        Collection::Exams => to_value(&data.exams),
    }
}

async fn history_response(store: &SchoolStore, changed: bool, verb: &str) -> HistoryResponse {
    let (undo_depth, redo_depth) = store.history_depth().await;
    HistoryResponse {
        changed,
        undo_depth,
        redo_depth,
        message: if changed {
            format!("{} successful", verb)
        } else {
            format!("Nothing to {}", verb.to_lowercase())
        },
    }
}

pub struct DataService;

impl DataService {
    #[instrument(skip(store, user), fields(username = %user.username()))]
    pub async fn export(
        store: &SchoolStore,
        user: &AuthUser,
        collection: Collection,
    ) -> Result<Value, AppError> {
        let value = store
            .read(|state| collection_value(state, user, collection))
            .await?;
        store
            .record_audit(
                user.username(),
                "export_data",
                format!("{} data exported", collection),
            )
            .await?;
        Ok(value)
    }

    pub async fn backup(store: &SchoolStore, actor: &str) -> Result<BackupBundle, AppError> {
        let bundle = store.backup().await;
        store
            .record_audit(actor, "backup_created", "System backup created")
            .await?;
        info!(students = bundle.data.students.len(), users = bundle.users.len(), "Backup created");
        Ok(bundle)
    }

    pub async fn restore(store: &SchoolStore, actor: &str, bundle: BackupBundle) -> Result<(), AppError> {
        store.restore(bundle, actor).await?;
        Ok(())
    }

    pub async fn reset(store: &SchoolStore, actor: &str) -> Result<(), AppError> {
        store.reset(actor).await?;
        Ok(())
    }

    pub async fn undo(store: &SchoolStore) -> Result<HistoryResponse, AppError> {
        let changed = store.undo().await?;
        Ok(history_response(store, changed, "Undo").await)
    }

    pub async fn redo(store: &SchoolStore) -> Result<HistoryResponse, AppError> {
        let changed = store.redo().await?;
        Ok(history_response(store, changed, "Redo").await)
    }

    pub async fn toggle_theme(store: &SchoolStore, actor: &str) -> Result<ThemeResponse, AppError> {
        let dark_mode = store
            .mutate(|tx| {
                tx.dark_mode = !tx.dark_mode;
                let mode = if tx.dark_mode { "dark" } else { "light" };
                tx.audit(actor, "toggle_theme", format!("Switched to {} theme", mode));
                Ok::<_, AppError>(tx.dark_mode)
            })
            .await?;
        Ok(ThemeResponse { dark_mode })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use schoolhub_auth::Session;

    fn user(role: Role, username: &str, name: &str) -> AuthUser {
        AuthUser(Session {
            token: "t".to_string(),
            user_id: 1,
            username: username.to_string(),
            role,
            name: name.to_string(),
            login_time: Utc::now(),
            last_activity: Utc::now(),
        })
    }

    #[tokio::test]
    async fn test_parent_export_is_scoped() {
        let store = SchoolStore::in_memory().await.unwrap();
        let admin = user(Role::Admin, "admin", "Admin");
        let parent = user(Role::Parent, "mdoe", "Mrs. Doe");

        let all = DataService::export(&store, &admin, Collection::Students).await.unwrap();
        assert_eq!(all.as_array().unwrap().len(), 2);
        let mine = DataService::export(&store, &parent, Collection::Students).await.unwrap();
        assert!(mine.as_array().unwrap().is_empty());

        let messages = DataService::export(&store, &parent, Collection::Messages).await.unwrap();
        assert!(messages.as_array().unwrap().is_empty());

        let log = store.read(|s| s.audit_log.clone()).await;
        assert_eq!(log.last().unwrap().details, "messages data exported");
    }

    #[tokio::test]
    async fn test_undo_redo_and_theme() {
        let store = SchoolStore::in_memory().await.unwrap();
        let nothing = DataService::undo(&store).await.unwrap();
        assert!(!nothing.changed);
        assert_eq!(nothing.message, "Nothing to undo");

        store
            .mutate(|tx| {
                tx.data.classes.push("12C".to_string());
                Ok::<_, AppError>(())
            })
            .await
            .unwrap();
        let undone = DataService::undo(&store).await.unwrap();
        assert!(undone.changed);
        assert_eq!(undone.redo_depth, 1);
        assert!(!store.read(|s| s.data.classes.contains(&"12C".to_string())).await);

        let redone = DataService::redo(&store).await.unwrap();
        assert!(redone.changed);
        assert!(store.read(|s| s.data.classes.contains(&"12C".to_string())).await);

        assert!(DataService::toggle_theme(&store, "admin").await.unwrap().dark_mode);
        assert!(!DataService::toggle_theme(&store, "admin").await.unwrap().dark_mode);
    }
}
