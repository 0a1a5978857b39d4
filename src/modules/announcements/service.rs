use anyhow::anyhow;
use schoolhub_core::{AppError, RecordId};
use schoolhub_models::announcements::{Announcement, CreateAnnouncementDto, DEFAULT_PRIORITY};
use schoolhub_store::SchoolStore;
use tracing::instrument;

use crate::utils::clock::today;

pub struct AnnouncementService;

impl AnnouncementService {
    /// Newest first.
    pub async fn list(store: &SchoolStore) -> Vec<Announcement> {
        store
            .read(|state| state.data.announcements.iter().rev().cloned().collect())
            .await
    }

    #[instrument(skip(store, dto), fields(title = %dto.title))]
    pub async fn create(
        store: &SchoolStore,
        actor: &str,
        dto: CreateAnnouncementDto,
    ) -> Result<Announcement, AppError> {
        store
            .mutate(|tx| {
                let announcement = Announcement {
                    id: tx.next_id(),
                    title: dto.title.trim().to_string(),
                    content: dto.content.trim().to_string(),
                    date: today(),
                    priority: dto
                        .priority
                        .map(|p| p.trim().to_lowercase())
                        .filter(|p| !p.is_empty())
                        .unwrap_or_else(|| DEFAULT_PRIORITY.to_string()),
                };
                tx.data.announcements.push(announcement.clone());
                tx.audit(
                    actor,
                    "add_announcement",
                    format!("Announcement posted: {}", announcement.title),
                );
                Ok::<_, AppError>(announcement)
            })
            .await
    }

    #[instrument(skip(store))]
    pub async fn delete(store: &SchoolStore, actor: &str, id: RecordId) -> Result<(), AppError> {
        store
            .mutate(|tx| {
                let index = tx
                    .data
                    .announcements
                    .iter()
                    .position(|a| a.id == id)
                    .ok_or_else(|| AppError::not_found(anyhow!("Announcement not found")))?;
                let removed = tx.data.announcements.remove(index);
                tx.audit(
                    actor,
                    "delete_announcement",
                    format!("Announcement deleted: {}", removed.title),
                );
                Ok(())
            })
            .await
    }
}
