//! Account management that bypasses the registration code.

use chrono::Utc;
use schoolhub_core::{check_password_strength, hash_password};
use schoolhub_models::{Role, User};
use schoolhub_store::SchoolStore;

pub struct NewAdmin {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Creates an administrator account (CLI only).
///
/// Unlike registration through the API no admin code is needed, but the
/// password must still pass the strength rules and `(username, admin)`
/// must be free.
pub async fn create_admin(
    store: &SchoolStore,
    admin: NewAdmin,
) -> Result<User, Box<dyn std::error::Error>> {
    let problems = check_password_strength(&admin.password);
    if !problems.is_empty() {
        return Err(format!("Weak password: {}", problems.join(", ")).into());
    }

    let username = admin.username.trim().to_string();
    if username.is_empty() {
        return Err("Username must not be empty".into());
    }

    store
        .mutate(|tx| {
            if tx.user(&username, Role::Admin).is_some() {
                return Err::<User, Box<dyn std::error::Error>>(
                    "An admin with this username already exists".into(),
                );
            }

            let user = User {
                id: tx.next_id(),
                role: Role::Admin,
                name: admin.name.trim().to_string(),
                email: admin.email.trim().to_string(),
                username: username.clone(),
                password: hash_password(&admin.password),
                phone: String::new(),
                address: String::new(),
                registered_date: Utc::now(),
                child_name: None,
                child_class: None,
            };
            tx.users.push(user.clone());
            tx.join_chat_groups(&user.username, Role::Admin);
            tx.audit("cli", "register", format!("Admin {} created from the CLI", username));
            Ok(user)
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolhub_core::verify_password;

    fn new_admin(username: &str, password: &str) -> NewAdmin {
        NewAdmin {
            name: "Head Office".to_string(),
            email: "office@school.com".to_string(),
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_admin_stores_digest() {
        let store = SchoolStore::in_memory().await.unwrap();
        let user = create_admin(&store, new_admin("office", "Secret123")).await.unwrap();

        assert_eq!(user.role, Role::Admin);
        assert_ne!(user.password, "Secret123");
        assert!(verify_password("Secret123", &user.password));

        let (stored, audited) = store
            .read(|s| (s.user("office", Role::Admin).cloned(), s.audit_log.len()))
            .await;
        assert_eq!(stored, Some(user));
        assert_eq!(audited, 1);
    }

    #[tokio::test]
    async fn test_create_admin_rejects_duplicate() {
        let store = SchoolStore::in_memory().await.unwrap();
        create_admin(&store, new_admin("office", "Secret123")).await.unwrap();
        let err = create_admin(&store, new_admin("office", "Other1234")).await.unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn test_create_admin_rejects_weak_password() {
        let store = SchoolStore::in_memory().await.unwrap();
        let err = create_admin(&store, new_admin("office", "short")).await.unwrap_err();
        assert!(err.to_string().starts_with("Weak password"));
        assert_eq!(store.read(|s| s.users.len()).await, 0);
    }
}
