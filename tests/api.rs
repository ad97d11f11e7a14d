//! HTTP contract tests, driven in-process through `Router::handle`.

use std::sync::Arc;

use serde_json::{Value, json};
use userdb::{Method, Request, Response, Router, UserStore, api};

fn app() -> (Arc<UserStore>, Router) {
    let store = Arc::new(UserStore::new());
    (Arc::clone(&store), api::routes(store))
}

async fn call(router: &Router, method: Method, path: &str, body: Option<Value>) -> Response {
    let body = body.map(|v| v.to_string()).unwrap_or_default();
    let req = Request::new(method, path, body).with_header("content-type", "application/json");
    router.handle(req).await
}

fn body_json(res: &Response) -> Value {
    serde_json::from_slice(res.body()).expect("response body is JSON")
}

#[tokio::test]
async fn create_get_delete_scenario() {
    let (_, router) = app();

    let res = call(&router, Method::Post, "/user/create", Some(json!({"name": "Ann", "email": "ann@x.com"}))).await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(body_json(&res), json!({"id": 0}));

    let res = call(&router, Method::Post, "/user/create", Some(json!({"name": "Bo", "email": "bo@x.com"}))).await;
    assert_eq!(body_json(&res), json!({"id": 1}));

    let res = call(&router, Method::Get, "/user/0", None).await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(body_json(&res), json!({"name": "Ann", "email": "ann@x.com"}));

    let res = call(&router, Method::Delete, "/user/delete/0", None).await;
    assert_eq!(res.status_code(), 200);
    assert!(res.body().is_empty());

    let res = call(&router, Method::Get, "/user/0", None).await;
    assert_eq!(res.status_code(), 404);
    assert_eq!(body_json(&res), json!({"detail": "User not found"}));

    let res = call(&router, Method::Get, "/user", None).await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(body_json(&res), json!([{"name": "Bo", "email": "bo@x.com"}]));
}

#[tokio::test]
async fn get_on_empty_store_is_404() {
    let (_, router) = app();
    let res = call(&router, Method::Get, "/user/999", None).await;
    assert_eq!(res.status_code(), 404);
    assert_eq!(body_json(&res), json!({"detail": "User not found"}));
}

#[tokio::test]
async fn delete_on_empty_store_is_404_and_changes_nothing() {
    let (store, router) = app();
    let res = call(&router, Method::Delete, "/user/delete/5", None).await;
    assert_eq!(res.status_code(), 404);
    assert_eq!(body_json(&res), json!({"detail": "User not found"}));
    assert!(store.is_empty());
    assert_eq!(store.next_id(), 0);
}

#[tokio::test]
async fn list_on_empty_store_is_empty_array() {
    let (_, router) = app();
    let res = call(&router, Method::Get, "/user", None).await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(body_json(&res), json!([]));
}

#[tokio::test]
async fn ids_are_not_reused_after_delete() {
    let (_, router) = app();
    let mut seen = Vec::new();
    for i in 0..5 {
        let res = call(&router, Method::Post, "/user/create", Some(json!({"name": format!("u{i}"), "email": "e"}))).await;
        let id = body_json(&res)["id"].as_u64().unwrap();
        seen.push(id);
        let res = call(&router, Method::Delete, &format!("/user/delete/{id}"), None).await;
        assert_eq!(res.status_code(), 200);
    }
    assert_eq!(seen, [0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn double_delete_is_404() {
    let (store, router) = app();
    call(&router, Method::Post, "/user/create", Some(json!({"name": "Ann", "email": "a"}))).await;
    call(&router, Method::Post, "/user/create", Some(json!({"name": "Bo", "email": "b"}))).await;

    assert_eq!(call(&router, Method::Delete, "/user/delete/0", None).await.status_code(), 200);
    let before = store.list();
    assert_eq!(call(&router, Method::Delete, "/user/delete/0", None).await.status_code(), 404);
    assert_eq!(store.list(), before);
}

#[tokio::test]
async fn malformed_create_body_is_422() {
    let (store, router) = app();
    for body in [json!({"name": "Ann"}), json!({"name": 1, "email": "a"}), json!([1, 2])] {
        let res = call(&router, Method::Post, "/user/create", Some(body)).await;
        assert_eq!(res.status_code(), 422);
        assert!(body_json(&res)["detail"].is_string());
    }
    let res = router.handle(Request::new(Method::Post, "/user/create", "not json")).await;
    assert_eq!(res.status_code(), 422);
    assert!(store.is_empty());
    assert_eq!(store.next_id(), 0);
}

#[tokio::test]
async fn non_integer_id_is_422() {
    let (_, router) = app();
    for path in ["/user/abc", "/user/-1", "/user/1.5"] {
        assert_eq!(call(&router, Method::Get, path, None).await.status_code(), 422, "{path}");
    }
    assert_eq!(call(&router, Method::Delete, "/user/delete/x", None).await.status_code(), 422);
}

#[tokio::test]
async fn duplicates_are_permitted() {
    let (_, router) = app();
    let user = json!({"name": "Ann", "email": "ann@x.com"});
    let a = call(&router, Method::Post, "/user/create", Some(user.clone())).await;
    let b = call(&router, Method::Post, "/user/create", Some(user.clone())).await;
    assert_ne!(body_json(&a), body_json(&b));

    let res = call(&router, Method::Get, "/user", None).await;
    assert_eq!(body_json(&res), json!([user.clone(), user]));
}

#[tokio::test]
async fn unknown_routes_and_methods() {
    let (_, router) = app();
    let res = call(&router, Method::Get, "/users", None).await;
    assert_eq!(res.status_code(), 404);
    assert_eq!(body_json(&res), json!({"detail": "Not Found"}));

    let res = call(&router, Method::Put, "/user", None).await;
    assert_eq!(res.status_code(), 405);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (_, router) = app();
    let res = call(&router, Method::Get, api::OPENAPI_PATH, None).await;
    assert_eq!(res.status_code(), 200);

    let doc = body_json(&res);
    assert_eq!(doc["openapi"], "3.1.0");
    assert_eq!(doc["paths"]["/user"]["get"]["operationId"], "listUsers");
    assert_eq!(doc["paths"]["/user/{id}"]["get"]["operationId"], "getUser");
    assert_eq!(doc["paths"]["/user/create"]["post"]["operationId"], "createUser");
    assert_eq!(doc["paths"]["/user/delete/{id}"]["delete"]["operationId"], "deleteUser");
    assert_eq!(
        doc["paths"]["/user/create"]["post"]["responses"]["200"]["links"]["deleteUserById"]["parameters"]["id"],
        "$response.body#/id"
    );
}

// ── Responses against the served schema ──────────────────────────────────────

fn resolve<'a>(doc: &'a Value, schema: &'a Value) -> &'a Value {
    match schema["$ref"].as_str().and_then(|r| r.strip_prefix("#/components/schemas/")) {
        Some(name) => &doc["components"]["schemas"][name],
        None => schema,
    }
}

fn conforms(doc: &Value, schema: &Value, value: &Value) -> Result<(), String> {
    let schema = resolve(doc, schema);
    match schema["type"].as_str() {
        Some("object") => {
            let obj = value.as_object().ok_or_else(|| format!("{value} is not an object"))?;
            for key in schema["required"].as_array().into_iter().flatten() {
                let key = key.as_str().unwrap_or_default();
                if !obj.contains_key(key) {
                    return Err(format!("{value} is missing `{key}`"));
                }
            }
            for (key, field) in obj {
                let declared = &schema["properties"][key.as_str()];
                if declared.is_null() {
                    return Err(format!("{value} has undeclared field `{key}`"));
                }
                conforms(doc, declared, field)?;
            }
            Ok(())
        }
        Some("array") => {
            let items = value.as_array().ok_or_else(|| format!("{value} is not an array"))?;
            items.iter().try_for_each(|item| conforms(doc, &schema["items"], item))
        }
        Some("string") if value.is_string() => Ok(()),
        Some("integer") => {
            let n = value.as_i64().ok_or_else(|| format!("{value} is not an integer"))?;
            match schema["minimum"].as_i64() {
                Some(min) if n < min => Err(format!("{n} is below minimum {min}")),
                _ => Ok(()),
            }
        }
        Some(other) => Err(format!("{value} is not a {other}")),
        None => Ok(()),
    }
}

#[tokio::test]
async fn responses_match_the_documented_schema() {
    let (_, router) = app();
    let doc = api::schema();
    let ann = json!({"name": "Ann", "email": "ann@x.com"});

    // Run in order: the first create issues id 0, the last delete removes it.
    let cases: &[(&userdb::openapi::Operation, &str, Option<Value>, u16)] = &[
        (&api::CREATE_USER, "/user/create", Some(ann.clone()), 200),
        (&api::CREATE_USER, "/user/create", Some(json!({"name": 1})), 422),
        (&api::LIST_USERS,  "/user", None, 200),
        (&api::GET_USER,    "/user/0", None, 200),
        (&api::GET_USER,    "/user/999", None, 404),
        (&api::GET_USER,    "/user/abc", None, 422),
        (&api::DELETE_USER, "/user/delete/999", None, 404),
        (&api::DELETE_USER, "/user/delete/x", None, 422),
        (&api::DELETE_USER, "/user/delete/0", None, 200),
    ];

    let mut exercised = Vec::new();
    for (op, path, body, expected) in cases {
        let res = call(&router, op.method, path, body.clone()).await;
        assert_eq!(res.status_code(), *expected, "{} {path}", op.id);

        let code = res.status_code().to_string();
        let documented = &doc["paths"][op.path][op.method.as_lower()]["responses"][code.as_str()];
        assert!(documented.is_object(), "{} answered undocumented {code}", op.id);

        let schema = &documented["content"]["application/json"]["schema"];
        if schema.is_null() {
            assert!(res.body().is_empty(), "{} {code} should have no body", op.id);
        } else if let Err(e) = conforms(&doc, schema, &body_json(&res)) {
            panic!("{} {path} -> {code}: {e}", op.id);
        }
        exercised.push((op.id, code));
    }

    for op in api::OPERATIONS {
        let responses = doc["paths"][op.path][op.method.as_lower()]["responses"]
            .as_object()
            .expect("responses object");
        for code in responses.keys() {
            assert!(
                exercised.iter().any(|(id, c)| *id == op.id && c == code),
                "{} {code} is documented but never exercised",
                op.id
            );
        }
    }
}
