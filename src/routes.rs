use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::Path;
use axum::handler::Handler;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};

use crate::config::{resolve_caller, AdminKey, ADMIN_KEY_HEADER};
use crate::err::{self, Error};
use crate::models::{Caller, Message, NewStudent, Student, StudentPayload};
use crate::service::{StudentProfileService, PROFILE_UPDATED};
use crate::store::StudentStore;

pub type Payload<T> = Result<Json<T>, Error>;

pub fn proceeds<V>(value: V) -> Payload<V> {
    Ok(Json(value))
}

#[derive(Clone)]
pub struct AppState {
    pub service: StudentProfileService,
    pub admin_key: Option<AdminKey>,
}

impl AppState {
    pub fn new(store: Arc<dyn StudentStore>, admin_key: Option<AdminKey>) -> Self {
        Self {
            service: StudentProfileService::new(store),
            admin_key,
        }
    }

    fn caller(&self, headers: &HeaderMap) -> Caller {
        let presented = headers
            .get(ADMIN_KEY_HEADER)
            .and_then(|value| value.to_str().ok());
        resolve_caller(self.admin_key.as_ref(), presented)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/students", post(create_student))
        .route(
            "/students/user/:user_id",
            get(get_student).put(update_student),
        )
        .fallback(err::handler404.into_service())
        .layer(Extension(state))
}

async fn get_student(
    user_id: Result<Path<i32>, PathRejection>,
    Extension(state): Extension<AppState>,
) -> Payload<Student> {
    let Path(user_id) = user_id?;
    proceeds(state.service.get_by_user_id(user_id).await?)
}

async fn update_student(
    user_id: Result<Path<i32>, PathRejection>,
    headers: HeaderMap,
    Extension(state): Extension<AppState>,
    body: Result<Json<StudentPayload>, JsonRejection>,
) -> Payload<Message> {
    let Path(user_id) = user_id?;
    let Json(payload) = body?;
    let caller = state.caller(&headers);
    state
        .service
        .update_by_user_id(user_id, payload, caller)
        .await?;
    proceeds(Message::of(PROFILE_UPDATED))
}

async fn create_student(
    headers: HeaderMap,
    Extension(state): Extension<AppState>,
    body: Result<Json<NewStudent>, JsonRejection>,
) -> Result<(StatusCode, Json<Student>), Error> {
    let Json(new) = body?;
    let caller = state.caller(&headers);
    let student = state.service.create(new, caller).await?;
    Ok((StatusCode::CREATED, Json(student)))
}
