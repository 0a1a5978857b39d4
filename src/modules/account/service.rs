use anyhow::anyhow;
use schoolhub_auth::SessionStore;
use schoolhub_core::{AppError, hash_password, verify_password};
use schoolhub_models::audit::AuditEntry;
use schoolhub_models::users::{ChangePasswordDto, UpdateAccountDto, UserProfile};
use schoolhub_store::SchoolStore;
use tracing::{info, instrument};

use super::model::AccountExport;
use crate::middleware::auth::AuthUser;

pub const RECENT_ACTIVITY_LIMIT: usize = 10;

fn account_missing() -> AppError {
    AppError::not_found(anyhow!("Account no longer exists"))
}

pub struct AccountService;

impl AccountService {
    pub async fn profile(store: &SchoolStore, user: &AuthUser) -> Result<UserProfile, AppError> {
        store
            .read(|state| state.user_by_id(user.0.user_id).map(|u| u.profile()))
            .await
            .ok_or_else(account_missing)
    }

    /// Update contact details. The new name shows up in the caller's open
    /// sessions right away.
    #[instrument(skip(store, sessions, user, dto), fields(username = %user.username()))]
    pub async fn update(
        store: &SchoolStore,
        sessions: &SessionStore,
        user: &AuthUser,
        dto: UpdateAccountDto,
    ) -> Result<UserProfile, AppError> {
        let profile = store
            .mutate(|tx| {
                let account = tx
                    .user_by_id_mut(user.0.user_id)
                    .ok_or_else(account_missing)?;
                account.name = dto.name.trim().to_string();
                account.email = dto.email.trim().to_string();
                if let Some(phone) = dto.phone {
                    account.phone = phone.trim().to_string();
                }
                if let Some(address) = dto.address {
                    account.address = address.trim().to_string();
                }
                let profile = account.profile();
                tx.audit(user.username(), "update_profile", "Profile information updated");
                Ok::<_, AppError>(profile)
            })
            .await?;

        sessions.rename(profile.id, &profile.name);
        Ok(profile)
    }

    #[instrument(skip(store, user, dto), fields(username = %user.username()))]
    pub async fn change_password(
        store: &SchoolStore,
        user: &AuthUser,
        dto: ChangePasswordDto,
    ) -> Result<(), AppError> {
        store
            .mutate(|tx| {
                let account = tx
                    .user_by_id_mut(user.0.user_id)
                    .ok_or_else(account_missing)?;
                if !verify_password(&dto.current_password, &account.password) {
                    return Err(AppError::bad_request(anyhow!("Current password is incorrect")));
                }
                account.password = hash_password(&dto.new_password);
                tx.audit(user.username(), "change_password", "Password changed successfully");
                Ok(())
            })
            .await?;
        info!("Password changed");
        Ok(())
    }

    pub async fn activity(store: &SchoolStore, user: &AuthUser) -> Vec<AuditEntry> {
        store
            .read(|state| state.recent_activity(user.username(), RECENT_ACTIVITY_LIMIT))
            .await
    }

    /// Profile plus the caller's full audit trail. The export itself is audited.
    #[instrument(skip(store, user), fields(username = %user.username()))]
    pub async fn export(store: &SchoolStore, user: &AuthUser) -> Result<AccountExport, AppError> {
        let profile = Self::profile(store, user).await?;
        store
            .record_audit(user.username(), "export_data", "Account data exported")
            .await?;
        let activity = store
            .read(|state| {
                state
                    .audit_log
                    .iter()
                    .filter(|e| e.user == user.username())
                    .cloned()
                    .collect()
            })
            .await;
        Ok(AccountExport { profile, activity })
    }
}
