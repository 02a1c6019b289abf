/// Integration tests for the EntityHub API
///
/// These tests drive the full router in-process against a real database:
/// - Registration and login, including duplicate and enumeration behavior
/// - Session guard rejection paths
/// - Entity CRUD with ownership scoping, search/filter/sort, status
///   filtering, cross-user isolation, and double delete
///
/// Requires a running PostgreSQL database (DATABASE_URL).

mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::json;

#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx.request("GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_register_returns_token_and_public_user() {
    let ctx = TestContext::new().await.unwrap();

    let (token, user, email, _) = ctx.register_user("register").await;

    assert!(!token.is_empty());
    assert_eq!(user["email"], email.as_str());
    assert_eq!(user["name"], "register");
    // The password hash must never appear in a response
    assert!(user.get("passwordHash").is_none());
    assert!(user.get("password_hash").is_none());
    assert!(user.get("password").is_none());
}

#[tokio::test]
async fn test_register_validation_failures() {
    let ctx = TestContext::new().await.unwrap();

    // Malformed email
    let (status, body) = ctx
        .request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({"name": "A", "email": "not-an-email", "password": "long-enough-pw"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    // Missing password field entirely
    let (status, body) = ctx
        .request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({"name": "A", "email": "a@x.com"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_duplicate_registration_creates_no_second_user() {
    let ctx = TestContext::new().await.unwrap();

    let (_, _, email, password) = ctx.register_user("dup").await;

    let (status, body) = ctx
        .request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({"name": "Imposter", "email": email, "password": "another-password"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    // The original credentials still log in, and the account kept its name
    let (status, body) = ctx
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": email, "password": password})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "dup");
}

#[tokio::test]
async fn test_login_enumeration_resistance() {
    let ctx = TestContext::new().await.unwrap();

    let (_, _, email, _) = ctx.register_user("enum").await;

    // Wrong password for a real account
    let (status_wrong_pw, body_wrong_pw) = ctx
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": email, "password": "wrong-password"})),
        )
        .await;

    // Unknown email
    let (status_unknown, body_unknown) = ctx
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "nobody-here@example.com", "password": "whatever-pw"})),
        )
        .await;

    assert_eq!(status_wrong_pw, StatusCode::UNAUTHORIZED);
    assert_eq!(status_unknown, StatusCode::UNAUTHORIZED);
    // Identical body: the caller cannot tell which part was wrong
    assert_eq!(body_wrong_pw, body_unknown);
}

#[tokio::test]
async fn test_session_guard_rejection_paths() {
    let ctx = TestContext::new().await.unwrap();

    // Missing header
    let (status, _) = ctx.request("GET", "/api/dashboard", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Garbage token
    let (status, _) = ctx
        .request("GET", "/api/dashboard", Some("garbage"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Well-formed but wrongly-signed token
    let foreign = entityhub_shared::auth::jwt::create_token(
        &entityhub_shared::auth::jwt::Claims::new(uuid::Uuid::new_v4()),
        "some-other-secret-that-is-32-bytes!!",
    )
    .unwrap();
    let (status, _) = ctx
        .request("GET", "/api/dashboard", Some(&foreign), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Valid signature but the subject does not exist
    let orphan = entityhub_shared::auth::jwt::create_token(
        &entityhub_shared::auth::jwt::Claims::new(uuid::Uuid::new_v4()),
        common::TEST_JWT_SECRET,
    )
    .unwrap();
    let (status, _) = ctx
        .request("GET", "/api/dashboard", Some(&orphan), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_dashboard_returns_caller_profile() {
    let ctx = TestContext::new().await.unwrap();

    let (token, _, email, _) = ctx.register_user("dashboard").await;

    let (status, body) = ctx.request("GET", "/api/dashboard", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], email.as_str());
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_entity_create_defaults_to_pending_and_round_trips() {
    let ctx = TestContext::new().await.unwrap();
    let (token, _, _, _) = ctx.register_user("crud").await;

    let (status, body) = ctx
        .request(
            "POST",
            "/api/entities",
            Some(&token),
            Some(json!({"name": "E1", "owner": "O1"})),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["entity"]["status"], "Pending");
    let id = body["entity"]["id"].as_str().unwrap().to_string();

    let (status, body) = ctx
        .request("GET", &format!("/api/entities/{}", id), Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entity"]["name"], "E1");
    assert_eq!(body["entity"]["owner"], "O1");
    assert_eq!(body["entity"]["status"], "Pending");
}

#[tokio::test]
async fn test_entity_create_requires_name_and_owner() {
    let ctx = TestContext::new().await.unwrap();
    let (token, _, _, _) = ctx.register_user("validation").await;

    let (status, body) = ctx
        .request(
            "POST",
            "/api/entities",
            Some(&token),
            Some(json!({"name": "Nameless"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, _) = ctx
        .request(
            "POST",
            "/api/entities",
            Some(&token),
            Some(json!({"name": "", "owner": "O"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_status_filter_scenario() {
    // Register -> create a Pending entity -> filtering on Active is empty
    let ctx = TestContext::new().await.unwrap();
    let (token, _, _, _) = ctx.register_user("filter").await;

    let (status, _) = ctx
        .request(
            "POST",
            "/api/entities",
            Some(&token),
            Some(json!({"name": "E1", "owner": "O1"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = ctx
        .request("GET", "/api/entities?status=Active", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entities"].as_array().unwrap().len(), 0);

    // The sentinel and the matching status both see it
    let (_, body) = ctx
        .request("GET", "/api/entities?status=All", Some(&token), None)
        .await;
    assert_eq!(body["entities"].as_array().unwrap().len(), 1);

    let (_, body) = ctx
        .request("GET", "/api/entities?status=Pending", Some(&token), None)
        .await;
    assert_eq!(body["entities"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_search_and_sort_parameters() {
    let ctx = TestContext::new().await.unwrap();
    let (token, _, _, _) = ctx.register_user("search").await;

    for (name, owner) in [("Alpha", "Zed"), ("Beta", "Ann"), ("Gamma", "alphonse")] {
        let (status, _) = ctx
            .request(
                "POST",
                "/api/entities",
                Some(&token),
                Some(json!({"name": name, "owner": owner})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // Substring match is case-insensitive and covers the owner label
    let (_, body) = ctx
        .request("GET", "/api/entities?search=alph", Some(&token), None)
        .await;
    let names: Vec<&str> = body["entities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 2); // "Alpha" by name, "Gamma" by owner label

    // Explicit sort
    let (_, body) = ctx
        .request(
            "GET",
            "/api/entities?sortBy=name&sortOrder=asc",
            Some(&token),
            None,
        )
        .await;
    let names: Vec<&str> = body["entities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Alpha", "Beta", "Gamma"]);

    // Unknown sort field falls back to the default order, not an error
    let (status, body) = ctx
        .request("GET", "/api/entities?sortBy=bogus", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entities"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_cross_user_isolation() {
    let ctx = TestContext::new().await.unwrap();
    let (token_a, _, _, _) = ctx.register_user("isolation-a").await;
    let (token_b, _, _, _) = ctx.register_user("isolation-b").await;

    // Both users create an entity named "Same"
    let (_, body_a) = ctx
        .request(
            "POST",
            "/api/entities",
            Some(&token_a),
            Some(json!({"name": "Same", "owner": "A"})),
        )
        .await;
    let entity_a_id = body_a["entity"]["id"].as_str().unwrap().to_string();

    ctx.request(
        "POST",
        "/api/entities",
        Some(&token_b),
        Some(json!({"name": "Same", "owner": "B"})),
    )
    .await;

    // Each list shows exactly one row — their own
    let (_, list_a) = ctx.request("GET", "/api/entities", Some(&token_a), None).await;
    let entities_a = list_a["entities"].as_array().unwrap();
    assert_eq!(entities_a.len(), 1);
    assert_eq!(entities_a[0]["owner"], "A");

    let (_, list_b) = ctx.request("GET", "/api/entities", Some(&token_b), None).await;
    let entities_b = list_b["entities"].as_array().unwrap();
    assert_eq!(entities_b.len(), 1);
    assert_eq!(entities_b[0]["owner"], "B");

    // B probing A's real id gets 404, never 401/403 — existence must not leak
    let uri = format!("/api/entities/{}", entity_a_id);

    let (status, body) = ctx.request("GET", &uri, Some(&token_b), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, _) = ctx
        .request("PUT", &uri, Some(&token_b), Some(json!({"name": "Stolen"})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx.request("DELETE", &uri, Some(&token_b), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // A's entity is untouched
    let (status, body) = ctx.request("GET", &uri, Some(&token_a), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entity"]["name"], "Same");
}

#[tokio::test]
async fn test_partial_update_preserves_omitted_fields() {
    let ctx = TestContext::new().await.unwrap();
    let (token, _, _, _) = ctx.register_user("update").await;

    let (_, body) = ctx
        .request(
            "POST",
            "/api/entities",
            Some(&token),
            Some(json!({"name": "Original", "owner": "Keeper"})),
        )
        .await;
    let id = body["entity"]["id"].as_str().unwrap().to_string();

    let (status, body) = ctx
        .request(
            "PUT",
            &format!("/api/entities/{}", id),
            Some(&token),
            Some(json!({"status": "Active"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entity"]["name"], "Original");
    assert_eq!(body["entity"]["owner"], "Keeper");
    assert_eq!(body["entity"]["status"], "Active");
}

#[tokio::test]
async fn test_delete_twice_yields_one_success_one_not_found() {
    let ctx = TestContext::new().await.unwrap();
    let (token, _, _, _) = ctx.register_user("delete").await;

    let (_, body) = ctx
        .request(
            "POST",
            "/api/entities",
            Some(&token),
            Some(json!({"name": "Doomed", "owner": "Nobody"})),
        )
        .await;
    let id = body["entity"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/entities/{}", id);

    let (status, body) = ctx.request("DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Entity deleted successfully");

    let (status, body) = ctx.request("DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_unknown_status_filter_is_rejected() {
    let ctx = TestContext::new().await.unwrap();
    let (token, _, _, _) = ctx.register_user("bad-status").await;

    let (status, body) = ctx
        .request("GET", "/api/entities?status=Bogus", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_oauth_routes_absent_without_credentials() {
    // The test config carries no provider credentials, so the oauth routes
    // must not exist at all.
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = ctx.request("GET", "/auth/oauth/google", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx.request("GET", "/auth/oauth/github", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
