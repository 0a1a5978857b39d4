use anyhow::anyhow;
use schoolhub_core::{AppError, RecordId};
use schoolhub_models::events::{CreateEventDto, DEFAULT_EVENT_TIME, Event};
use schoolhub_store::SchoolStore;
use tracing::instrument;

use crate::utils::clock::format_date;

fn text(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

pub struct EventService;

impl EventService {
    /// Calendar order: by date, then time.
    pub async fn list(store: &SchoolStore) -> Vec<Event> {
        let mut events = store.read(|state| state.data.events.clone()).await;
        events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.time.cmp(&b.time)));
        events
    }

    #[instrument(skip(store, dto), fields(title = %dto.title))]
    pub async fn create(
        store: &SchoolStore,
        actor: &str,
        dto: CreateEventDto,
    ) -> Result<Event, AppError> {
        store
            .mutate(|tx| {
                let time = text(dto.time);
                let event = Event {
                    id: tx.next_id(),
                    title: dto.title.trim().to_string(),
                    date: format_date(dto.date),
                    time: if time.is_empty() {
                        DEFAULT_EVENT_TIME.to_string()
                    } else {
                        time
                    },
                    location: text(dto.location),
                    event_type: text(dto.event_type),
                    description: text(dto.description),
                };
                tx.data.events.push(event.clone());
                tx.audit(
                    actor,
                    "add_event",
                    format!("Event scheduled: {} on {}", event.title, event.date),
                );
                Ok::<_, AppError>(event)
            })
            .await
    }

    #[instrument(skip(store))]
    pub async fn delete(store: &SchoolStore, actor: &str, id: RecordId) -> Result<(), AppError> {
        store
            .mutate(|tx| {
                let index = tx
                    .data
                    .events
                    .iter()
                    .position(|e| e.id == id)
                    .ok_or_else(|| AppError::not_found(anyhow!("Event not found")))?;
                let removed = tx.data.events.remove(index);
                tx.audit(actor, "delete_event", format!("Event deleted: {}", removed.title));
                Ok(())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_event_time_defaults_to_morning() {
        let store = SchoolStore::in_memory().await.unwrap();
        let dto = CreateEventDto {
            title: "Science Fair".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 5, 20).unwrap(),
            time: Some("  ".to_string()),
            location: None,
            event_type: Some("academic".to_string()),
            description: None,
        };
        let event = EventService::create(&store, "admin", dto).await.unwrap();
        assert_eq!(event.time, "09:00");
        assert_eq!(event.date, "2026-05-20");

        let listed = EventService::list(&store).await;
        assert!(listed.iter().any(|e| e.id == event.id));
        assert!(listed.windows(2).all(|w| w[0].date <= w[1].date));
    }
}
