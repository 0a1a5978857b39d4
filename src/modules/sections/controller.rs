use anyhow::anyhow;
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};
use schoolhub_core::{AppError, RecordId};
use schoolhub_models::{Collection, Role};
use tracing::instrument;

use super::pages::{
    certificate_page, login_page, print_page, register_page, timetable_print_page,
};
use super::service::{PageContext, SectionQuery, render_section};
use crate::middleware::auth::{AuthUser, PageUser, session_token};
use crate::modules::data::service::collection_value;
use crate::modules::messages::service::MessageService;
use crate::state::AppState;
use crate::utils::clock::today;
use crate::utils::html::{dashboard_shell, document, section_title};

fn signed_in(state: &AppState, headers: &HeaderMap) -> bool {
    session_token(headers, &state.config.session.cookie_name)
        .and_then(|token| state.sessions.peek(&token))
        .is_some()
}

async fn dark_mode(state: &AppState) -> bool {
    state.store.read(|s| s.dark_mode).await
}

/// `/` sends signed-in users to their dashboard, everyone else to login.
pub async fn home(State(state): State<AppState>, headers: HeaderMap) -> Redirect {
    if signed_in(&state, &headers) {
        Redirect::to("/app/dashboard")
    } else {
        Redirect::to("/login")
    }
}

pub async fn show_login(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if signed_in(&state, &headers) {
        return Redirect::to("/app/dashboard").into_response();
    }
    Html(login_page(dark_mode(&state).await)).into_response()
}

pub async fn show_register(State(state): State<AppState>) -> Html<String> {
    let (dark, classes) = state
        .store
        .read(|s| (s.dark_mode, s.data.classes.clone()))
        .await;
    Html(register_page(dark, &classes))
}

#[instrument(skip(state, session, query), fields(username = %session.username))]
pub async fn show_section(
    State(state): State<AppState>,
    PageUser(session): PageUser,
    Path(section): Path<String>,
    Query(query): Query<SectionQuery>,
) -> Result<Html<String>, AppError> {
    let conversation = match (section.as_str(), query.with.as_deref()) {
        ("messages", Some(other)) => Some(
            MessageService::conversation(&state.store, &AuthUser(session.clone()), other).await?,
        ),
        _ => None,
    };

    let page = state
        .store
        .read(|snapshot| {
            let ctx = PageContext {
                state: snapshot,
                session: &session,
                query: &query,
                conversation: conversation.as_deref(),
            };
            let content = render_section(&ctx, &section);
            let shell = dashboard_shell(session.role, &section, &session.name, &content);
            document(section_title(&section, session.role), snapshot.dark_mode, &shell)
        })
        .await;
    Ok(Html(page))
}

#[instrument(skip(state, session), fields(username = %session.username))]
pub async fn print_collection(
    State(state): State<AppState>,
    PageUser(session): PageUser,
    Path(collection): Path<String>,
) -> Result<Html<String>, AppError> {
    let collection: Collection = collection
        .parse()
        .map_err(|e: String| AppError::bad_request(anyhow!(e)))?;
    let user = AuthUser(session);
    let (value, dark) = state
        .store
        .read(|s| collection_value(s, &user, collection).map(|v| (v, s.dark_mode)))
        .await?;
    Ok(Html(print_page(collection, &value, dark)))
}

#[instrument(skip(state, session), fields(username = %session.username))]
pub async fn show_certificate(
    State(state): State<AppState>,
    PageUser(session): PageUser,
    Path(id): Path<RecordId>,
) -> Result<Html<String>, AppError> {
    if session.role != Role::Admin {
        return Err(AppError::forbidden("Only administrators can issue certificates"));
    }
    let student = state
        .store
        .read(|s| s.data.student(id).cloned())
        .await
        .ok_or_else(|| AppError::not_found(anyhow!("Student with id {} not found", id)))?;
    Ok(Html(certificate_page(&student, &today())))
}

pub async fn print_timetable(
    State(state): State<AppState>,
    PageUser(session): PageUser,
) -> Result<Html<String>, AppError> {
    if session.role == Role::Parent {
        return Err(AppError::forbidden("Access denied. Required role: admin or teacher"));
    }
    let timetable = state.store.read(|s| s.timetable.clone()).await;
    Ok(Html(timetable_print_page(&timetable, &session.name)))
}
