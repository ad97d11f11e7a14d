//! User endpoints.
//!
//! | Operation | Route |
//! |---|---|
//! | `listUsers` | `GET /user` |
//! | `getUser` | `GET /user/{id}` |
//! | `createUser` | `POST /user/create` |
//! | `deleteUser` | `DELETE /user/delete/{id}` |
//!
//! Handlers are plain functions over a borrowed [`UserStore`]; [`routes`]
//! binds them to a shared store instance.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::method::Method;
use crate::openapi::{self, Body, Link, Operation};
use crate::request::{Rejection, Request};
use crate::response::{IntoResponse, Json, Response};
use crate::router::Router;
use crate::status::Status;
use crate::store::{Id, StoreError, User, UserStore};

pub const LIST_USERS: Operation = Operation {
    id: "listUsers",
    method: Method::Get,
    path: "/user",
    summary: "List users",
    request: None,
    response: Body::ArrayOf("User"),
    not_found: false,
    links: &[],
};

pub const GET_USER: Operation = Operation {
    id: "getUser",
    method: Method::Get,
    path: "/user/{id}",
    summary: "Get user",
    request: None,
    response: Body::Schema("User"),
    not_found: true,
    links: &[],
};

pub const CREATE_USER: Operation = Operation {
    id: "createUser",
    method: Method::Post,
    path: "/user/create",
    summary: "Create user",
    request: Some("User"),
    response: Body::Schema("Created"),
    not_found: false,
    links: &[
        Link {
            name: "getUserById",
            operation_id: GET_USER.id,
            parameter: "id",
            expression: "$response.body#/id",
        },
        Link {
            name: "deleteUserById",
            operation_id: DELETE_USER.id,
            parameter: "id",
            expression: "$response.body#/id",
        },
    ],
};

pub const DELETE_USER: Operation = Operation {
    id: "deleteUser",
    method: Method::Delete,
    path: "/user/delete/{id}",
    summary: "Delete user",
    request: None,
    response: Body::Empty,
    not_found: true,
    links: &[],
};

pub const OPERATIONS: [Operation; 4] = [LIST_USERS, GET_USER, CREATE_USER, DELETE_USER];

pub const OPENAPI_PATH: &str = "/openapi.json";

/// Response body of a successful create.
#[derive(Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Created {
    pub id: Id,
}

/// Failure of a user endpoint.
#[derive(Debug)]
pub enum ApiError {
    NotFound,
    Rejected(Rejection),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => Self::NotFound,
        }
    }
}

impl From<Rejection> for ApiError {
    fn from(r: Rejection) -> Self { Self::Rejected(r) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => Response::detail(Status::NotFound, "User not found"),
            Self::Rejected(r) => r.into_response(),
        }
    }
}

pub fn list_users(store: &UserStore, _req: Request) -> Json<Vec<User>> {
    Json(store.list())
}

pub fn get_user(store: &UserStore, req: Request) -> Result<Json<User>, ApiError> {
    let id = req.param_as::<Id>("id")?;
    Ok(Json(store.get(id)?))
}

pub fn create_user(store: &UserStore, req: Request) -> Result<Json<Created>, ApiError> {
    let user: User = req.json()?;
    Ok(Json(Created { id: store.add(user) }))
}

pub fn delete_user(store: &UserStore, req: Request) -> Result<Status, ApiError> {
    let id = req.param_as::<Id>("id")?;
    store.remove(id)?;
    Ok(Status::Ok)
}

/// The OpenAPI document describing [`OPERATIONS`].
pub fn schema() -> serde_json::Value {
    openapi::document(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), &OPERATIONS)
}

/// Builds the service router over `store`, including `GET /openapi.json`.
pub fn routes(store: Arc<UserStore>) -> Router {
    let doc = Arc::new(schema());

    let router = Router::new().on(Method::Get, OPENAPI_PATH, move |_req: Request| {
        let doc = Arc::clone(&doc);
        async move { Json(serde_json::Value::clone(&doc)) }
    });

    let router = bind(router, &LIST_USERS, &store, list_users);
    let router = bind(router, &GET_USER, &store, get_user);
    let router = bind(router, &CREATE_USER, &store, create_user);
    bind(router, &DELETE_USER, &store, delete_user)
}

fn bind<R>(router: Router, op: &Operation, store: &Arc<UserStore>, f: fn(&UserStore, Request) -> R) -> Router
where
    R: IntoResponse + Send + 'static,
{
    let store = Arc::clone(store);
    router.on(op.method, op.path, move |req: Request| {
        let store = Arc::clone(&store);
        async move { f(&store, req) }
    })
}
