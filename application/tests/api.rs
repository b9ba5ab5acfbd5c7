use application::{api, bootstrap_admin, config, Service};
use axum::{body::Body, Router};
use http::{header, Request, StatusCode};
use http_body_util::BodyExt as _;
use serde_json::{json, Value};
use service::infra::Memory;
use tower::ServiceExt as _;

const MISSING_ID: &str = "00000000-0000-4000-8000-000000000000";

async fn app() -> Router {
    let service =
        Service::new((&config::Service::default()).into(), Memory::new());
    bootstrap_admin(
        &service,
        &config::Admin {
            email: "admin@example.it".to_owned(),
            password: "admin-pass".to_owned(),
        },
    )
    .await
    .unwrap();
    api::router(service)
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(body) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => req.body(Body::empty()),
    }
    .unwrap();

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = call(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"email": email, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["token"].as_str().unwrap().to_owned()
}

/// Registers a new identity, links a tenant to it and returns its token
/// along with the tenant ID.
async fn tenant(
    app: &Router,
    admin: &str,
    email: &str,
    tax_code: &str,
) -> (String, String) {
    let (status, body) = call(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({"email": email, "password": "pass"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let token = body["token"].as_str().unwrap().to_owned();
    let identity_id = body["identity"]["id"].as_str().unwrap().to_owned();

    let (status, body) = call(
        app,
        "POST",
        "/tenants",
        Some(admin),
        Some(json!({
            "identityId": identity_id,
            "taxCode": tax_code,
            "firstName": "Mario",
            "lastName": "Rossi",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    (token, body["id"].as_str().unwrap().to_owned())
}

async fn property(app: &Router, admin: &str) -> String {
    let (status, body) = call(
        app,
        "POST",
        "/properties",
        Some(admin),
        Some(json!({
            "address": "Via Roma 1",
            "city": "Milano",
            "surface": 80,
            "kind": "RESIDENTIAL",
            "floor": 2,
            "rooms": 3,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["kind"], "RESIDENTIAL");
    body["id"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn registers_and_signs_in() {
    let app = app().await;

    let (status, body) = call(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({"email": "mario@example.it", "password": "pass"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["identity"]["roles"], json!(["TENANT"]));
    assert!(body["identity"].get("passwordHash").is_none());

    let token = login(&app, "mario@example.it", "pass").await;
    let (status, me) = call(&app, "GET", "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK, "{me}");
    assert_eq!(me["email"], "mario@example.it");
    assert_eq!(me["tenantId"], Value::Null);

    let (status, body) = call(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"email": "mario@example.it", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHENTICATED");
    assert_eq!(body["message"], "login required");
    assert_eq!(body["path"], "/auth/login");
}

#[tokio::test]
async fn rejects_occupied_email() {
    let app = app().await;
    let creds = json!({"email": "admin@example.it", "password": "pass"});

    let (status, body) =
        call(&app, "POST", "/auth/register", None, Some(creds)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BUSINESS_RULE_VIOLATED");
}

#[tokio::test]
async fn anonymous_is_unauthenticated_never_forbidden() {
    let app = app().await;

    for (method, uri) in [
        ("GET", "/auth/me"),
        ("GET", "/tenants"),
        ("POST", "/tenants"),
        ("POST", "/contracts"),
        ("GET", "/properties"),
        ("PUT", "/identities/not-an-id/roles"),
    ] {
        let (status, body) = call(&app, method, uri, None, None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(body["message"], "login required");
        assert_eq!(body["status"], 401);
        assert!(body["timestamp"].is_string());
    }
}

#[tokio::test]
async fn tenant_role_is_forbidden_on_staff_routes() {
    let app = app().await;
    let admin = login(&app, "admin@example.it", "admin-pass").await;
    let (mario, _) =
        tenant(&app, &admin, "mario@example.it", "RSSMRA85T10A562S").await;

    let (status, body) = call(&app, "GET", "/tenants", Some(&mario), None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");
    assert_eq!(body["message"], "insufficient permission");
}

#[tokio::test]
async fn bad_tokens_require_login() {
    let app = app().await;

    let (status, body) =
        call(&app, "GET", "/auth/me", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "TOKEN_MALFORMED");
    assert_eq!(body["message"], "login required");

    // Public routes ignore a broken token.
    drop(login(&app, "admin@example.it", "admin-pass").await);
    let (status, _) = call(
        &app,
        "POST",
        "/auth/login",
        Some("garbage"),
        Some(json!({"email": "admin@example.it", "password": "admin-pass"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn disabled_identity_loses_access() {
    let app = app().await;
    let admin = login(&app, "admin@example.it", "admin-pass").await;
    let (_, body) = call(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({"email": "mario@example.it", "password": "pass"})),
    )
    .await;
    let token = body["token"].as_str().unwrap().to_owned();
    let id = body["identity"]["id"].as_str().unwrap().to_owned();

    let (status, body) = call(
        &app,
        "POST",
        &format!("/identities/{id}/disable"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["enabled"], false);

    let (status, _) = call(&app, "GET", "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn grants_roles() {
    let app = app().await;
    let admin = login(&app, "admin@example.it", "admin-pass").await;
    let (_, body) = call(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({"email": "luigi@example.it", "password": "pass"})),
    )
    .await;
    let token = body["token"].as_str().unwrap().to_owned();
    let id = body["identity"]["id"].as_str().unwrap().to_owned();

    let (status, body) = call(
        &app,
        "PUT",
        &format!("/identities/{id}/roles"),
        Some(&admin),
        Some(json!({"roles": ["MANAGER"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["roles"], json!(["MANAGER"]));

    let (status, _) = call(&app, "GET", "/tenants", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn creates_contract_with_schedule() {
    let app = app().await;
    let admin = login(&app, "admin@example.it", "admin-pass").await;
    let (mario, mario_id) =
        tenant(&app, &admin, "mario@example.it", "RSSMRA85T10A562S").await;
    let (luigi, luigi_id) =
        tenant(&app, &admin, "luigi@example.it", "12345678901").await;
    let property_id = property(&app, &admin).await;

    let (status, body) = call(
        &app,
        "POST",
        "/contracts",
        Some(&admin),
        Some(json!({
            "tenantId": mario_id,
            "propertyId": property_id,
            "startDate": "2024-01-15",
            "durationYears": 1,
            "annualRent": 1200,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["contract"]["frequency"], "TRIMESTRALE");
    assert_eq!(body["contract"]["installmentCount"], 4);
    let contract_id = body["contract"]["id"].as_str().unwrap().to_owned();
    let installments = body["installments"].as_array().unwrap();
    assert_eq!(
        installments
            .iter()
            .map(|i| i["dueDate"].as_str().unwrap())
            .collect::<Vec<_>>(),
        ["2024-01-15", "2024-04-15", "2024-07-15", "2024-10-15"],
    );
    assert!(installments.iter().all(|i| i["paid"] == "N"));
    let first_id = installments[0]["id"].as_str().unwrap().to_owned();

    let uri = format!("/contracts/{contract_id}");
    let (status, _) = call(&app, "GET", &uri, Some(&mario), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, "GET", &uri, Some(&luigi), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = call(&app, "GET", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let uri = format!("/tenants/{luigi_id}/contracts");
    let (status, _) = call(&app, "GET", &uri, Some(&mario), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let uri = format!("/tenants/{mario_id}/contracts");
    let (status, body) = call(&app, "GET", &uri, Some(&mario), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let uri = format!("/installments/{first_id}/pay");
    let (status, _) = call(&app, "POST", &uri, Some(&mario), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = call(&app, "POST", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["paid"], "S");
    let (status, body) = call(&app, "POST", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BUSINESS_RULE_VIOLATED");

    let uri = format!("/contracts/{contract_id}/installments?paidAsBoolean=true");
    let (status, body) = call(&app, "GET", &uri, Some(&mario), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(
        body.as_array()
            .unwrap()
            .iter()
            .map(|i| i["paid"].clone())
            .collect::<Vec<_>>(),
        [json!(true), json!(false), json!(false), json!(false)],
    );
}

#[tokio::test]
async fn rejects_invalid_schedules() {
    let app = app().await;
    let admin = login(&app, "admin@example.it", "admin-pass").await;
    let (_, mario_id) =
        tenant(&app, &admin, "mario@example.it", "RSSMRA85T10A562S").await;
    let property_id = property(&app, &admin).await;
    let contract = |years: i64, rent: i64| {
        json!({
            "tenantId": mario_id,
            "propertyId": property_id,
            "startDate": "2024-01-15",
            "durationYears": years,
            "annualRent": rent,
            "frequency": "MENSILE",
        })
    };

    let (status, body) =
        call(&app, "POST", "/contracts", Some(&admin), Some(contract(0, 1200)))
            .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BUSINESS_RULE_VIOLATED");
    assert_eq!(body["message"], "duration must be at least 1 year");

    let (status, body) =
        call(&app, "POST", "/contracts", Some(&admin), Some(contract(1, 0)))
            .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BUSINESS_RULE_VIOLATED");

    let (status, body) =
        call(&app, "POST", "/contracts", Some(&admin), Some(contract(-1, 1200)))
            .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_FAILED");
    assert!(body["errors"]["durationYears"].is_string());

    let uri = format!("/tenants/{mario_id}/contracts");
    let (_, body) = call(&app, "GET", &uri, Some(&admin), None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn lists_every_invalid_field() {
    let app = app().await;
    let admin = login(&app, "admin@example.it", "admin-pass").await;

    let (status, body) = call(
        &app,
        "POST",
        "/tenants",
        Some(&admin),
        Some(json!({
            "identityId": "nope",
            "taxCode": "ABC",
            "firstName": "Mario",
            "lastName": " ",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_FAILED");
    assert_eq!(body["path"], "/tenants");
    let errors = body["errors"].as_object().unwrap();
    assert!(errors.contains_key("identityId"));
    assert!(errors.contains_key("taxCode"));
    assert!(errors.contains_key("lastName"));
    assert!(!errors.contains_key("firstName"));

    let (status, body) =
        call(&app, "POST", "/tenants", Some(&admin), Some(json!([]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn reports_missing_entities() {
    let app = app().await;
    let admin = login(&app, "admin@example.it", "admin-pass").await;
    let (mario, _) =
        tenant(&app, &admin, "mario@example.it", "RSSMRA85T10A562S").await;

    let uri = format!("/contracts/{MISSING_ID}");
    let (status, body) = call(&app, "GET", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "ENTITY_NOT_FOUND");
    assert_eq!(body["message"], "Contract not found");
    assert_eq!(body["path"], uri);

    let (status, body) = call(&app, "GET", &uri, Some(&mario), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Contract not found");

    for uri in [
        format!("/tenants/{MISSING_ID}"),
        format!("/tenants/{MISSING_ID}/contracts"),
    ] {
        let (status, body) = call(&app, "GET", &uri, Some(&mario), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["message"], "Tenant not found");
    }
    let (status, body) = call(
        &app,
        "POST",
        "/maintenance",
        Some(&mario),
        Some(json!({
            "tenantId": MISSING_ID,
            "propertyId": MISSING_ID,
            "description": "Broken boiler",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Tenant not found");

    let (status, body) = call(&app, "GET", "/nowhere", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["path"], "/nowhere");
}

#[tokio::test]
async fn tenant_requests_own_maintenance() {
    let app = app().await;
    let admin = login(&app, "admin@example.it", "admin-pass").await;
    let (mario, mario_id) =
        tenant(&app, &admin, "mario@example.it", "RSSMRA85T10A562S").await;
    let (luigi, _) =
        tenant(&app, &admin, "luigi@example.it", "12345678901").await;
    let property_id = property(&app, &admin).await;
    let request = json!({
        "tenantId": mario_id,
        "propertyId": property_id,
        "description": "Broken boiler",
    });

    let (status, _) = call(
        &app,
        "POST",
        "/maintenance",
        Some(&luigi),
        Some(request.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) =
        call(&app, "POST", "/maintenance", Some(&mario), Some(request)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let uri = format!("/maintenance/{}", body["id"].as_str().unwrap());

    let (status, body) = call(&app, "GET", &uri, Some(&mario), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["tenantId"], mario_id.as_str());
    let (status, _) = call(&app, "GET", &uri, Some(&luigi), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&app, "GET", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let uri = format!("/maintenance/{MISSING_ID}");
    for token in [mario.as_str(), admin.as_str()] {
        let (status, body) = call(&app, "GET", &uri, Some(token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Maintenance not found");
    }

    let uri = format!("/tenants/{mario_id}/maintenance");
    let (status, body) = call(&app, "GET", &uri, Some(&mario), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["description"], "Broken boiler");
}
