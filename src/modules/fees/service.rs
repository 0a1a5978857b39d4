use anyhow::anyhow;
use schoolhub_core::{AppError, RecordId};
use schoolhub_models::Role;
use schoolhub_observability::track_payment_recorded;
use schoolhub_store::{Mutation, SchoolStore};
use tracing::{info, instrument};

use super::model::{FeeRow, FeeSummary, PaymentReceipt};
use crate::middleware::auth::AuthUser;

fn apply_payment(
    tx: &mut Mutation<'_>,
    actor: &str,
    student_id: RecordId,
    amount: f64,
) -> Result<PaymentReceipt, AppError> {
    let student = tx
        .data
        .student_mut(student_id)
        .ok_or_else(|| AppError::not_found(anyhow!("Student with id {} not found", student_id)))?;
    let applied = student.fees.apply_payment(amount);
    let row = FeeRow::from(&*student);
    tx.audit(
        actor,
        "record_payment",
        format!("Payment of ${:.2} recorded for {}", applied, row.name),
    );
    Ok(PaymentReceipt { applied, fees: row })
}

pub struct FeeService;

impl FeeService {
    /// Fee status for every student, or only the caller's child for parents.
    pub async fn summary(store: &SchoolStore, user: &AuthUser) -> FeeSummary {
        let rows = store
            .read(|state| {
                state
                    .data
                    .students
                    .iter()
                    .filter(|s| {
                        user.role() != Role::Parent || s.parent.as_deref() == Some(user.name())
                    })
                    .map(FeeRow::from)
                    .collect()
            })
            .await;
        FeeSummary::from_rows(rows)
    }

    /// Credit a payment, never letting `paid` exceed `total`.
    #[instrument(skip(store))]
    pub async fn record_payment(
        store: &SchoolStore,
        actor: &str,
        student_id: RecordId,
        amount: f64,
    ) -> Result<PaymentReceipt, AppError> {
        let receipt = store
            .mutate(|tx| apply_payment(tx, actor, student_id, amount))
            .await?;
        track_payment_recorded(receipt.applied);
        info!(applied = receipt.applied, "Payment recorded");
        Ok(receipt)
    }

    /// A parent paying towards their own child's fees.
    #[instrument(skip(store, user), fields(username = %user.username()))]
    pub async fn pay_own_child(
        store: &SchoolStore,
        user: &AuthUser,
        amount: f64,
    ) -> Result<PaymentReceipt, AppError> {
        let child_id = store
            .read(|state| {
                state
                    .data
                    .students
                    .iter()
                    .find(|s| s.parent.as_deref() == Some(user.name()))
                    .map(|s| s.id)
            })
            .await
            .ok_or_else(|| AppError::not_found(anyhow!("No child is linked to this account")))?;

        Self::record_payment(store, user.username(), child_id, amount).await
    }
}
