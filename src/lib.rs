//! # userdb
//!
//! An in-memory user record service over HTTP.
//!
//! Records are `{name, email}` pairs keyed by a store-assigned integer id.
//! Ids only ever move forward: deleting a record never frees its id.
//!
//! | Route | Success | Failure |
//! |---|---|---|
//! | `GET /user` | `200` array of users | — |
//! | `GET /user/{id}` | `200` user | `404 {"detail":"User not found"}` |
//! | `POST /user/create` | `200 {"id": n}` | `422` on a malformed body |
//! | `DELETE /user/delete/{id}` | `200` empty | `404 {"detail":"User not found"}` |
//! | `GET /openapi.json` | `200` OpenAPI document | — |
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use userdb::{Server, UserStore, api};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), userdb::Error> {
//!     let app = api::routes(Arc::new(UserStore::new()));
//!     Server::bind("127.0.0.1:8000".parse().unwrap()).await?.serve(app).await
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod api;
pub mod config;
pub mod openapi;
pub mod store;

pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use request::{Rejection, Request};
pub use response::{Detail, IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
pub use store::{Id, StoreError, User, UserStore};
