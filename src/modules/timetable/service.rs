use anyhow::anyhow;
use schoolhub_core::AppError;
use schoolhub_models::timetable::{Timetable, TimetableRow};
use schoolhub_store::SchoolStore;
use tracing::instrument;

pub const EXPORT_FILE_NAME: &str = "timetable_export.json";

pub struct TimetableService;

impl TimetableService {
    pub async fn get(store: &SchoolStore) -> Timetable {
        store.read(|state| state.timetable.clone()).await
    }

    /// Replace the whole grid. Cells are trimmed; slot labels must be set.
    #[instrument(skip(store, timetable), fields(rows = timetable.rows.len()))]
    pub async fn save(
        store: &SchoolStore,
        actor: &str,
        timetable: Timetable,
    ) -> Result<Timetable, AppError> {
        let rows: Vec<TimetableRow> = timetable
            .rows
            .into_iter()
            .map(|row| TimetableRow {
                time: row.time.trim().to_string(),
                monday: row.monday.trim().to_string(),
                tuesday: row.tuesday.trim().to_string(),
                wednesday: row.wednesday.trim().to_string(),
                thursday: row.thursday.trim().to_string(),
                friday: row.friday.trim().to_string(),
            })
            .collect();
        if rows.iter().any(|row| row.time.is_empty()) {
            return Err(AppError::bad_request(anyhow!("Every row needs a time slot")));
        }

        store
            .mutate(|tx| {
                tx.timetable = Timetable { rows };
                tx.audit(actor, "save_timetable", "Timetable updated");
                Ok(tx.timetable.clone())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_replaces_grid() {
        let store = SchoolStore::in_memory().await.unwrap();
        assert_eq!(TimetableService::get(&store).await, Timetable::default());

        let mut timetable = Timetable::default();
        timetable.rows[0].monday = " Math 10A ".to_string();
        let saved = TimetableService::save(&store, "wilson", timetable).await.unwrap();
        assert_eq!(saved.rows[0].monday, "Math 10A");
        assert_eq!(TimetableService::get(&store).await.rows[0].monday, "Math 10A");
    }

    #[tokio::test]
    async fn test_blank_slot_is_rejected() {
        let store = SchoolStore::in_memory().await.unwrap();
        let timetable = Timetable {
            rows: vec![TimetableRow::empty("  ")],
        };
        assert!(TimetableService::save(&store, "wilson", timetable).await.is_err());
    }
}
