use anyhow::anyhow;
use chrono::Utc;
use schoolhub_auth::{Session, SessionStore};
use schoolhub_config::RegistrationConfig;
use schoolhub_core::{AppError, hash_password, is_password_digest, verify_password};
use schoolhub_models::students::{Fees, Student, default_marks};
use schoolhub_models::users::{LoginRequest, RegisterRequestDto};
use schoolhub_models::{Role, User};
use schoolhub_observability::{track_login_failure, track_login_success, track_user_registered};
use schoolhub_store::SchoolStore;
use tracing::{info, instrument, warn};

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub struct AuthService;

impl AuthService {
    /// Create an account. Parents may register their child at the same
    /// time, which adds a student record linked to the parent's name.
    #[instrument(skip(store, config, dto), fields(username = %dto.username, role = %dto.role))]
    pub async fn register(
        store: &SchoolStore,
        config: &RegistrationConfig,
        dto: RegisterRequestDto,
    ) -> Result<User, AppError> {
        if dto.role == Role::Admin
            && dto.admin_code.as_deref().map(str::trim) != Some(config.admin_code.as_str())
        {
            return Err(AppError::forbidden("Invalid admin code"));
        }

        let default_fee = config.default_student_fee;
        let user = store
            .mutate(move |tx| {
                let username = dto.username.trim().to_string();
                if tx.user(&username, dto.role).is_some() {
                    return Err(AppError::conflict(anyhow!(
                        "Username with this role already exists"
                    )));
                }

                let is_parent = dto.role == Role::Parent;
                let child_name = non_blank(dto.child_name).filter(|_| is_parent);
                let child_class = non_blank(dto.child_class).filter(|_| is_parent);

                let user = User {
                    id: tx.next_id(),
                    role: dto.role,
                    name: dto.name.trim().to_string(),
                    email: dto.email.trim().to_string(),
                    username,
                    password: hash_password(&dto.password),
                    phone: non_blank(dto.phone).unwrap_or_default(),
                    address: non_blank(dto.address).unwrap_or_default(),
                    registered_date: Utc::now(),
                    child_name: child_name.clone(),
                    child_class: child_class.clone(),
                };
                tx.users.push(user.clone());

                if let (Some(name), Some(class_name)) = (child_name, child_class) {
                    let student = Student {
                        id: tx.next_id(),
                        name,
                        class_name,
                        attendance: 100,
                        marks: default_marks(),
                        fees: Fees::new(default_fee),
                        gpa: 0.0,
                        parent: Some(user.name.clone()),
                        email: None,
                        phone: None,
                        dob: None,
                        address: None,
                    };
                    tx.data.students.push(student);
                }

                tx.join_chat_groups(&user.username, user.role);
                tx.audit(
                    &user.username,
                    "register",
                    format!(
                        "New user {} registered with role {}",
                        user.username, user.role
                    ),
                );
                Ok(user)
            })
            .await?;

        track_user_registered(user.role.as_str());
        info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Check credentials for the requested role and open a session.
    #[instrument(skip(store, sessions, dto), fields(username = %dto.username, role = %dto.role))]
    pub async fn login(
        store: &SchoolStore,
        sessions: &SessionStore,
        dto: LoginRequest,
    ) -> Result<(Session, User), AppError> {
        // Accounts registered by other instances may only exist in the
        // legacy shared copies so far.
        store.merge_legacy_shared_users().await;

        let username = dto.username.trim();
        let user = store
            .read(|state| state.user(username, dto.role).cloned())
            .await
            .filter(|user| verify_password(&dto.password, &user.password));

        let Some(user) = user else {
            track_login_failure("invalid_credentials");
            warn!("Login rejected");
            return Err(AppError::unauthorized(
                "Invalid credentials! Please register first.",
            ));
        };

        let session = sessions.create(&user);
        let (name, role, id) = (user.username.clone(), user.role, user.id);
        let rehash = (!is_password_digest(&user.password)).then(|| hash_password(&dto.password));
        store
            .mutate(move |tx| {
                if let (Some(digest), Some(account)) = (rehash, tx.user_by_id_mut(id)) {
                    account.password = digest;
                    info!(user_id = id, "Stored password upgraded to a digest");
                }
                tx.join_chat_groups(&name, role);
                tx.audit(&name, "login", format!("User {} logged in", name));
                Ok::<_, AppError>(())
            })
            .await?;

        track_login_success(user.role.as_str());
        Ok((session, user))
    }

    #[instrument(skip(store, sessions, token))]
    pub async fn logout(
        store: &SchoolStore,
        sessions: &SessionStore,
        token: &str,
    ) -> Result<(), AppError> {
        if let Some(session) = sessions.revoke(token) {
            store
                .record_audit(
                    &session.username,
                    "logout",
                    format!("User {} logged out", session.username),
                )
                .await?;
        }
        Ok(())
    }
}
