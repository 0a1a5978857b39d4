use anyhow::anyhow;
use schoolhub_core::{AppError, RecordId};
use schoolhub_models::transport::{CreateRouteDto, DEFAULT_ROUTE_CAPACITY, TransportRoute};
use schoolhub_store::SchoolStore;
use tracing::instrument;

pub struct TransportService;

impl TransportService {
    pub async fn list(store: &SchoolStore) -> Vec<TransportRoute> {
        store.read(|state| state.data.transport.clone()).await
    }

    #[instrument(skip(store, dto), fields(route = %dto.route))]
    pub async fn create(
        store: &SchoolStore,
        actor: &str,
        dto: CreateRouteDto,
    ) -> Result<TransportRoute, AppError> {
        store
            .mutate(|tx| {
                let route = TransportRoute {
                    id: tx.next_id(),
                    route: dto.route.trim().to_string(),
                    driver: dto.driver.trim().to_string(),
                    students: Vec::new(),
                    capacity: dto.capacity.unwrap_or(DEFAULT_ROUTE_CAPACITY),
                };
                tx.data.transport.push(route.clone());
                tx.audit(actor, "add_route", format!("Transport route added: {}", route.route));
                Ok::<_, AppError>(route)
            })
            .await
    }

    #[instrument(skip(store))]
    pub async fn delete(store: &SchoolStore, actor: &str, id: RecordId) -> Result<(), AppError> {
        store
            .mutate(|tx| {
                let index = tx
                    .data
                    .transport
                    .iter()
                    .position(|r| r.id == id)
                    .ok_or_else(|| AppError::not_found(anyhow!("Route not found")))?;
                let removed = tx.data.transport.remove(index);
                tx.audit(
                    actor,
                    "delete_route",
                    format!("Transport route deleted: {}", removed.route),
                );
                Ok(())
            })
            .await
    }

    /// Put a student on a route. Routes hold student names.
    #[instrument(skip(store))]
    pub async fn assign_student(
        store: &SchoolStore,
        actor: &str,
        route_id: RecordId,
        student_id: RecordId,
    ) -> Result<TransportRoute, AppError> {
        store
            .mutate(|tx| {
                let student_name = tx
                    .data
                    .student(student_id)
                    .map(|s| s.name.clone())
                    .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))?;
                let route = tx
                    .data
                    .transport
                    .iter_mut()
                    .find(|r| r.id == route_id)
                    .ok_or_else(|| AppError::not_found(anyhow!("Route not found")))?;

                if route.students.contains(&student_name) {
                    return Err(AppError::conflict(anyhow!(
                        "{} is already on this route",
                        student_name
                    )));
                }
                if route.is_full() {
                    return Err(AppError::bad_request(anyhow!(
                        "Route {} is full ({} seats)",
                        route.route,
                        route.capacity
                    )));
                }

                route.students.push(student_name.clone());
                let route = route.clone();
                tx.audit(
                    actor,
                    "assign_route",
                    format!("{} assigned to {}", student_name, route.route),
                );
                Ok(route)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_route_capacity_and_duplicates() {
        let store = SchoolStore::in_memory().await.unwrap();
        let route = TransportService::create(
            &store,
            "admin",
            CreateRouteDto {
                route: "North Loop".to_string(),
                driver: "Sam".to_string(),
                capacity: Some(1),
            },
        )
        .await
        .unwrap();
        assert!(route.students.is_empty());

        let student_ids: Vec<RecordId> = store
            .read(|state| state.data.students.iter().map(|s| s.id).collect())
            .await;
        assert!(student_ids.len() >= 2);

        TransportService::assign_student(&store, "admin", route.id, student_ids[0])
            .await
            .unwrap();
        let duplicate =
            TransportService::assign_student(&store, "admin", route.id, student_ids[0]).await;
        assert_eq!(duplicate.unwrap_err().status, axum::http::StatusCode::CONFLICT);
        let full = TransportService::assign_student(&store, "admin", route.id, student_ids[1]).await;
        assert_eq!(full.unwrap_err().status, axum::http::StatusCode::BAD_REQUEST);
    }
}
