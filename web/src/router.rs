use crate::controller::{
    connection_controller, health_check_controller, oauth_controller, profile_controller,
};
use crate::AppState;
use axum::{routing::get, Router};

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Contacts Directory API"
        ),
        paths(
            oauth_controller::login,
            oauth_controller::callback,
            oauth_controller::logout,
            connection_controller::index,
            connection_controller::contacts,
            profile_controller::read,
            health_check_controller::health_check,
        ),
        components(
            schemas(
                crate::controller::LoginStatus,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "contacts_directory", description = "Google contacts grouped by email domain")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Defines our cookie session requirement for OpenAPI. The session cookie is issued on the
// first request and ties the browser to its Google credential.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "id",
                    "Session id value returned via Set-Cookie header",
                ))),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(oauth_routes(app_state.clone()))
        .merge(connection_routes(app_state.clone()))
        .merge(profile_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn oauth_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/login", get(oauth_controller::login))
        .route("/login/callback", get(oauth_controller::callback))
        .route("/logout", get(oauth_controller::logout))
        .with_state(app_state)
}

fn connection_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/connections", get(connection_controller::index))
        .route("/contacts", get(connection_controller::contacts))
        .with_state(app_state)
}

fn profile_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/me", get(profile_controller::read))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use crate::{app, AppState};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, Response, StatusCode};
    use axum::Router;
    use clap::Parser;
    use domain::gateway::google::new_provider;
    use domain::login::LoginFlow;
    use domain::MemoryStorage;
    use mockito::{Matcher, Mock, Server, ServerGuard};
    use serde_json::{json, Value};
    use service::config::Config;
    use std::sync::Arc;
    use tower::ServiceExt;

    const HOST: &str = "localhost:5000";

    fn test_app(server: &ServerGuard) -> Router {
        app_with_args(server, &[])
    }

    fn app_with_args(server: &ServerGuard, args: &[&str]) -> Router {
        let argv = std::iter::once("contacts_directory").chain(args.iter().copied());
        let config = Config::parse_from(argv)
            .set_google_credentials("client-id".to_string(), "client-secret".to_string())
            .set_google_base_url(&server.url());
        let provider = Arc::new(new_provider(&config).unwrap());
        let login_flow = Arc::new(LoginFlow::new(provider, Arc::new(MemoryStorage::new())));
        app(AppState::new(config, login_flow))
    }

    async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut request = Request::builder().uri(uri).header(header::HOST, HOST);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        app.clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn json_body(response: Response<Body>) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn session_cookie(response: &Response<Body>) -> String {
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    fn returned_state(response: &Response<Body>) -> String {
        let location = response.headers().get(header::LOCATION).unwrap().to_str().unwrap();
        url::Url::parse(location)
            .unwrap()
            .query_pairs()
            .find(|(key, _)| key == "state")
            .map(|(_, value)| value.into_owned())
            .unwrap()
    }

    async fn token_mock(server: &mut ServerGuard, expected_calls: usize) -> Mock {
        server
            .mock("POST", "/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("code".into(), "auth-code".into()),
                Matcher::UrlEncoded(
                    "redirect_uri".into(),
                    "https://localhost:5000/login/callback".into(),
                ),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "access_token": "ya29.token",
                    "refresh_token": "1//refresh",
                    "expires_in": 3599,
                    "scope": "openid https://www.googleapis.com/auth/contacts.readonly"
                })
                .to_string(),
            )
            .expect(expected_calls)
            .create_async()
            .await
    }

    async fn people_mocks(server: &mut ServerGuard) -> (Mock, Mock) {
        let me = server
            .mock("GET", "/v1/people/me")
            .match_query(Matcher::Any)
            .match_header("authorization", "Bearer ya29.token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "names": [{ "displayName": "Ada Lovelace", "givenName": "Ada", "familyName": "Lovelace" }],
                    "emailAddresses": [{ "value": "ada@home.org", "metadata": { "primary": true } }],
                    "photos": [{ "url": "https://photos.test/ada.jpg" }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let connections = server
            .mock("GET", "/v1/people/me/connections")
            .match_query(Matcher::Any)
            .match_header("authorization", "Bearer ya29.token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "connections": [
                        { "names": [{ "displayName": "Grace" }], "emailAddresses": [{ "value": "grace@navy.mil" }] },
                        { "names": [{ "displayName": "Charles" }], "emailAddresses": [{ "value": "charles@engine.org" }] },
                        { "names": [{ "displayName": "No Email" }] }
                    ],
                    "totalItems": 3,
                    "totalPeople": 3
                })
                .to_string(),
            )
            .create_async()
            .await;

        (me, connections)
    }

    /// Runs /login and its callback, returning the session cookie.
    async fn log_in(app: &Router) -> String {
        let response = get(app, "/login", None).await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        let cookie = session_cookie(&response);
        let state = returned_state(&response);

        let response = get(
            app,
            &format!("/login/callback?code=auth-code&state={state}"),
            Some(&cookie),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"logged": true, "message": "Logged in successfully. Get data requesting /connections"})
        );

        cookie
    }

    #[tokio::test]
    async fn test_health() {
        let server = Server::new_async().await;
        let response = get(&test_app(&server), "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    async fn get_with_origin(app: &Router, origin: &str) -> Response<Body> {
        let request = Request::builder()
            .uri("/health")
            .header(header::HOST, HOST)
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_wildcard_origin_allows_any_without_credentials() {
        let server = Server::new_async().await;
        let app = app_with_args(&server, &["--allowed-origins", "*"]);

        let response = get_with_origin(&app, "https://anywhere.example").await;
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(!headers.contains_key(header::ACCESS_CONTROL_ALLOW_CREDENTIALS));
    }

    #[tokio::test]
    async fn test_listed_origin_is_echoed_with_credentials() {
        let server = Server::new_async().await;
        let app = app_with_args(&server, &["--allowed-origins", "https://app.example"]);

        let response = get_with_origin(&app, "https://app.example").await;
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://app.example");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");

        let response = get_with_origin(&app, "https://other.example").await;
        assert!(!response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn test_unauthenticated_connections_returns_notice() {
        let server = Server::new_async().await;
        let response = get(&test_app(&server), "/connections", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"logged": false, "message": "No Google account logged. Try to request /login"})
        );
    }

    #[tokio::test]
    async fn test_login_redirects_to_google_with_https_callback() {
        let server = Server::new_async().await;
        let response = get(&test_app(&server), "/login", None).await;

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        let location = response.headers().get(header::LOCATION).unwrap().to_str().unwrap();
        let url = url::Url::parse(location).unwrap();
        let pairs: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();

        assert!(location.starts_with(&format!("{}/o/oauth2/auth", server.url())));
        assert_eq!(pairs["redirect_uri"], "https://localhost:5000/login/callback");
        assert_eq!(pairs["access_type"], "offline");
        assert_eq!(pairs["state"].len(), 64);
    }

    #[tokio::test]
    async fn test_login_then_connections_groups_by_domain() {
        let mut server = Server::new_async().await;
        let app = test_app(&server);
        let token = token_mock(&mut server, 1).await;
        let (_me, _connections) = people_mocks(&mut server).await;

        let cookie = log_in(&app).await;
        token.assert_async().await;

        let response = get(&app, "/connections", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["logged"], true);
        assert_eq!(body["userinfo"]["primary_email"], "ada@home.org");
        assert_eq!(
            body["connections"],
            json!({
                "navy.mil": [{"name": "Grace", "email": "grace@navy.mil"}],
                "engine.org": [{"name": "Charles", "email": "charles@engine.org"}]
            })
        );
        assert_eq!(body["total_items"], 2);
        assert_eq!(body["total_people"], 2);
    }

    #[tokio::test]
    async fn test_contacts_and_me() {
        let mut server = Server::new_async().await;
        let app = test_app(&server);
        let _token = token_mock(&mut server, 1).await;
        let (_me, _connections) = people_mocks(&mut server).await;

        let cookie = log_in(&app).await;

        let body = json_body(get(&app, "/contacts", Some(&cookie)).await).await;
        assert_eq!(body["connections"].as_array().unwrap().len(), 2);
        assert_eq!(body["total_items"], 2);

        let body = json_body(get(&app, "/contacts?all=true", Some(&cookie)).await).await;
        assert_eq!(body["connections"].as_array().unwrap().len(), 3);
        assert_eq!(body["total_items"], 3);

        let body = json_body(get(&app, "/me", Some(&cookie)).await).await;
        assert_eq!(body["logged"], true);
        assert_eq!(body["userinfo"]["display_name"], "Ada Lovelace");
        assert_eq!(body["userinfo"]["photo_url"], "https://photos.test/ada.jpg");
    }

    #[tokio::test]
    async fn test_forged_state_is_rejected_without_token_exchange() {
        let mut server = Server::new_async().await;
        let app = test_app(&server);
        let token = token_mock(&mut server, 0).await;

        let response = get(&app, "/login", None).await;
        let cookie = session_cookie(&response);

        let response = get(
            &app,
            "/login/callback?code=auth-code&state=forged",
            Some(&cookie),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        token.assert_async().await;
    }

    #[tokio::test]
    async fn test_callback_with_provider_error_is_bad_request() {
        let server = Server::new_async().await;
        let response = get(
            &test_app(&server),
            "/login/callback?error=access_denied",
            None,
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_logout_forgets_credential() {
        let mut server = Server::new_async().await;
        let app = test_app(&server);
        let _token = token_mock(&mut server, 1).await;

        let cookie = log_in(&app).await;

        for _ in 0..2 {
            let response = get(&app, "/logout", Some(&cookie)).await;
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                json_body(response).await,
                json!({"logged": false, "message": "Logged out successfully"})
            );
        }

        let body = json_body(get(&app, "/me", Some(&cookie)).await).await;
        assert_eq!(body["logged"], false);
    }

    #[tokio::test]
    async fn test_token_endpoint_failure_is_bad_gateway() {
        let mut server = Server::new_async().await;
        let app = test_app(&server);
        let _token = server
            .mock("POST", "/token")
            .with_status(400)
            .with_body(json!({"error": "invalid_grant"}).to_string())
            .create_async()
            .await;

        let response = get(&app, "/login", None).await;
        let cookie = session_cookie(&response);
        let state = returned_state(&response);

        let response = get(
            &app,
            &format!("/login/callback?code=auth-code&state={state}"),
            Some(&cookie),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
