//! HTTP handler functions for the crime portal API.

use actix_web::http::{StatusCode, header};
use actix_web::{HttpRequest, HttpResponse, web};
use crime_portal_identity::{IdentityError, Session, SessionProvider as _};
use crime_portal_report_models::{CrimeType, Report};
use crime_portal_server_models::{
    AddUserRequest, ApiCrimeType, ApiHealth, ApiReport, ApiUser, DashboardResponse,
    ItemQueryParams, ItemStatusRequest, LoginRequest, ReportQueryParams, StatusChangeRequest,
    SubmitItemRequest, SubmitReportRequest, UserQueryParams, UserRoleRequest, UserStatusRequest,
};
use crime_portal_store::{query, stats, status, submit_report};
use crime_portal_user_models::{NewUser, Role, User};

use crate::AppState;
use crate::error::{ServerError, respond, respond_with};

/// Extracts the token from an `Authorization: Bearer <token>` header.
fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn session(state: &AppState, req: &HttpRequest) -> Option<Session> {
    bearer_token(req).and_then(|token| state.users.session(token))
}

fn authenticate(state: &AppState, req: &HttpRequest) -> Result<User, ServerError> {
    session(state, req)
        .current_user()
        .ok_or(ServerError::Identity(IdentityError::Unauthenticated))
}

fn with_transitions(report: Report) -> ApiReport {
    ApiReport {
        available_transitions: status::available_transitions(&report),
        report,
    }
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /api/auth/login`
pub async fn login(state: web::Data<AppState>, body: web::Json<LoginRequest>) -> HttpResponse {
    respond(
        state
            .users
            .login(&body.email, &body.password)
            .map_err(ServerError::from),
    )
}

/// `POST /api/auth/register`
///
/// Creates a citizen account and returns its session.
pub async fn register(state: web::Data<AppState>, body: web::Json<NewUser>) -> HttpResponse {
    respond_with(
        StatusCode::CREATED,
        state
            .users
            .register(body.into_inner())
            .map_err(ServerError::from),
    )
}

/// `POST /api/auth/logout`
pub async fn logout(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    if let Some(token) = bearer_token(&req) {
        state.users.logout(token);
    }
    HttpResponse::NoContent().finish()
}

/// `GET /api/auth/me`
pub async fn me(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    respond(authenticate(&state, &req))
}

/// `GET /api/reports`
///
/// Lists the reports visible to the caller that match the query filters,
/// newest first.
pub async fn list_reports(
    state: web::Data<AppState>,
    req: HttpRequest,
    params: web::Query<ReportQueryParams>,
) -> HttpResponse {
    respond(authenticate(&state, &req).and_then(|viewer| {
        let filter = params.to_filter().map_err(ServerError::InvalidRequest)?;
        Ok(query::query_reports(&state.reports, &viewer, &filter))
    }))
}

/// `POST /api/reports`
///
/// The submitter is always the session user, never a body field.
pub async fn create_report(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<SubmitReportRequest>,
) -> HttpResponse {
    respond_with(
        StatusCode::CREATED,
        authenticate(&state, &req).and_then(|user| {
            let draft = body
                .into_inner()
                .into_draft(user.id)
                .map_err(ServerError::InvalidRequest)?;
            Ok(submit_report(&state.reports, draft)?)
        }),
    )
}

/// `GET /api/reports/{id}`
pub async fn get_report(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<u64>,
) -> HttpResponse {
    let id = path.into_inner();
    respond(authenticate(&state, &req).and_then(|viewer| {
        let report = query::get_visible_report(&state.reports, &viewer, id)?;
        Ok(with_transitions(report))
    }))
}

/// `PATCH /api/reports/{id}/status`
pub async fn change_report_status(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<u64>,
    body: web::Json<StatusChangeRequest>,
) -> HttpResponse {
    let id = path.into_inner();
    respond(authenticate(&state, &req).and_then(|actor| {
        let report = status::transition(&state.reports, id, body.status, &actor)?;
        Ok(with_transitions(report))
    }))
}

/// `GET /api/dashboard`
///
/// Status counts and the most recent reports, scoped to the caller.
pub async fn dashboard(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    respond(authenticate(&state, &req).map(|viewer| DashboardResponse {
        stats: stats::report_stats(&state.reports, &viewer),
        recent_reports: query::recent_reports(
            &state.reports,
            &viewer,
            query::DEFAULT_RECENT_LIMIT,
        ),
    }))
}

/// `GET /api/crime-types`
pub async fn crime_types() -> HttpResponse {
    let types: Vec<ApiCrimeType> = CrimeType::all()
        .iter()
        .copied()
        .map(ApiCrimeType::from)
        .collect();
    HttpResponse::Ok().json(types)
}

/// `GET /api/users`
///
/// Admin-only listing with each user's report count.
pub async fn list_users(
    state: web::Data<AppState>,
    req: HttpRequest,
    params: web::Query<UserQueryParams>,
) -> HttpResponse {
    respond(authenticate(&state, &req).and_then(|actor| {
        let filter = params.to_filter().map_err(ServerError::InvalidRequest)?;
        let users = state.users.list_users(&actor, &filter)?;
        Ok(users
            .into_iter()
            .map(|user| ApiUser {
                reports: state.reports.count_for_user(user.id),
                user,
            })
            .collect::<Vec<_>>())
    }))
}

/// `POST /api/users`
pub async fn add_user(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<AddUserRequest>,
) -> HttpResponse {
    respond_with(
        StatusCode::CREATED,
        authenticate(&state, &req).and_then(|actor| {
            let AddUserRequest { user, role } = body.into_inner();
            let role = role.unwrap_or(Role::Citizen);
            Ok(state.users.add_user(&actor, user, role)?)
        }),
    )
}

/// `PATCH /api/users/{id}/status`
pub async fn set_user_status(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<u64>,
    body: web::Json<UserStatusRequest>,
) -> HttpResponse {
    let id = path.into_inner();
    respond(authenticate(&state, &req).and_then(|actor| {
        Ok(state.users.set_user_status(&actor, id, body.status)?)
    }))
}

/// `PATCH /api/users/{id}/role`
pub async fn set_user_role(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<u64>,
    body: web::Json<UserRoleRequest>,
) -> HttpResponse {
    let id = path.into_inner();
    respond(
        authenticate(&state, &req)
            .and_then(|actor| Ok(state.users.set_user_role(&actor, id, body.role)?)),
    )
}

/// `GET /api/missing-items`
pub async fn list_items(
    state: web::Data<AppState>,
    req: HttpRequest,
    params: web::Query<ItemQueryParams>,
) -> HttpResponse {
    respond(authenticate(&state, &req).and_then(|_| {
        let filter = params.to_filter().map_err(ServerError::InvalidRequest)?;
        Ok(state.items.list(&filter))
    }))
}

/// `POST /api/missing-items`
pub async fn create_item(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<SubmitItemRequest>,
) -> HttpResponse {
    respond_with(
        StatusCode::CREATED,
        authenticate(&state, &req).and_then(|user| {
            let draft = body
                .into_inner()
                .into_draft(user.id)
                .map_err(ServerError::InvalidRequest)?;
            Ok(state.items.submit(draft)?)
        }),
    )
}

/// `PATCH /api/missing-items/{id}/status`
pub async fn set_item_status(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<u64>,
    body: web::Json<ItemStatusRequest>,
) -> HttpResponse {
    let id = path.into_inner();
    respond(
        authenticate(&state, &req)
            .and_then(|actor| Ok(state.items.set_status(id, body.status, &actor)?)),
    )
}
