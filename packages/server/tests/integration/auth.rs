use serde_json::json;

use crate::common::{TestApp, TestResponse, routes};

mod registration {
    use super::*;

    #[tokio::test]
    async fn new_user_can_register_with_a_display_name() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "alice", "password": "securepass", "display_name": " Alice B "}),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["id"].is_number());
        assert_eq!(res.body["username"], "alice");
        assert_eq!(res.body["display_name"], "Alice B");
    }

    #[tokio::test]
    async fn display_name_falls_back_to_username() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "bob", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["display_name"], "bob");
    }

    #[tokio::test]
    async fn cannot_register_with_an_already_taken_username() {
        let app = TestApp::spawn().await;
        let body = json!({"username": "alice", "password": "securepass"});

        let first = app.post_without_token(routes::REGISTER, &body).await;
        assert_eq!(first.status, 201, "First registration failed: {}", first.text);

        let res = app.post_without_token(routes::REGISTER, &body).await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "USERNAME_TAKEN");
    }

    #[tokio::test]
    async fn cannot_register_with_a_password_that_is_too_short() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "alice", "password": "short"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn cannot_register_with_an_invalid_username() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "no spaces!", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn registered_user_receives_a_token_and_the_user_role() {
        let app = TestApp::spawn().await;
        let body = json!({"username": "alice", "password": "securepass"});

        let reg = app.post_without_token(routes::REGISTER, &body).await;
        assert_eq!(reg.status, 201, "Registration failed: {}", reg.text);
        let res = app.post_without_token(routes::LOGIN, &body).await;

        assert_eq!(res.status, 200);
        assert!(res.body["token"].is_string());
        assert_eq!(res.body["username"], "alice");
        assert_eq!(res.body["role"], "user");
    }

    #[tokio::test]
    async fn cannot_login_with_wrong_password() {
        let app = TestApp::spawn().await;
        app.create_authenticated_user("alice", "securepass").await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "alice", "password": "wrongpass"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn cannot_login_with_nonexistent_username() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "nobody", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }
}

mod request_validation {
    use super::*;

    #[tokio::test]
    async fn malformed_json_body_returns_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .client
            .post(format!("http://{}{}", app.addr, routes::REGISTER))
            .header("Content-Type", "application/json")
            .body("not valid json")
            .send()
            .await
            .expect("Failed to send request");

        let res = TestResponse::from_response(res).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn missing_required_fields_returns_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::REGISTER, &json!({"username": "alice"}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod authenticated_access {
    use super::*;

    #[tokio::test]
    async fn authenticated_user_can_retrieve_their_profile() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let res = app.get_with_token(routes::ME, &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["username"], "alice");
        assert!(res.body["id"].is_number());
        assert_eq!(res.body["role"], "user");
    }

    #[tokio::test]
    async fn request_without_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::ME).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn request_with_malformed_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::ME, "not-a-valid-jwt").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn request_with_non_bearer_auth_scheme_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .client
            .get(format!("http://{}{}", app.addr, routes::ME))
            .header("Authorization", "Basic abc123")
            .send()
            .await
            .expect("Failed to send request");

        let res = TestResponse::from_response(res).await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn health_endpoint_reports_ok() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::HEALTH).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["status"], "ok");
    }
}

mod profile {
    use super::*;

    #[tokio::test]
    async fn display_name_can_be_changed_and_reset() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let res = app
            .put_with_token(routes::PROFILE, &json!({"display_name": "  Alice C. "}), &token)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["username"], "alice");
        assert_eq!(res.body["display_name"], "Alice C.");

        let unchanged = app.put_with_token(routes::PROFILE, &json!({}), &token).await;
        assert_eq!(unchanged.status, 200);
        assert_eq!(unchanged.body["display_name"], "Alice C.");

        let reset = app
            .put_with_token(routes::PROFILE, &json!({"display_name": "   "}), &token)
            .await;
        assert_eq!(reset.status, 200);
        assert_eq!(reset.body["display_name"], "alice");
    }

    #[tokio::test]
    async fn new_display_name_shows_up_as_build_owner() {
        let app = TestApp::spawn().await;
        let admin = app.create_user_with_role("admin", "adminpass", "admin").await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        let gpu = app.create_component(&admin, "GPU", "RTX 4070", 259_000).await;
        let build = app
            .create_build(
                &token,
                &json!({
                    "name": "Render node",
                    "is_public": true,
                    "components": [{"category": "GPU", "component_id": gpu}],
                }),
            )
            .await;

        app.put_with_token(routes::PROFILE, &json!({"display_name": "Alice"}), &token)
            .await;

        let res = app.get_without_token(&routes::build(&build)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["owner"]["display_name"], "Alice");
    }

    #[tokio::test]
    async fn too_long_display_name_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let res = app
            .put_with_token(routes::PROFILE, &json!({"display_name": "x".repeat(65)}), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn profile_update_requires_a_token() {
        let app = TestApp::spawn().await;

        let res = app
            .client
            .put(format!("http://{}{}", app.addr, routes::PROFILE))
            .json(&json!({"display_name": "Nobody"}))
            .send()
            .await
            .expect("Failed to send request");

        let res = TestResponse::from_response(res).await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }
}
