use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use cookie::Cookie;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, warn};

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    email: String,
    password: String,
    name: String,
    #[serde(default)]
    is_provider: bool,
    business_name: Option<String>,
    category: Option<String>,
    experience: Option<String>,
}

#[derive(Deserialize)]
struct AuthTokens {
    access_token: String,
    refresh_token: String,
}

#[derive(Deserialize)]
struct AuthServiceResponse {
    data: AuthTokens,
}

fn auth_base_url() -> String {
    std::env::var("AUTH_API_URL").unwrap_or_else(|_| "http://auth.localhost:8080".to_string())
}

fn session_cookie(name: &str, value: String) -> Cookie<'static> {
    let mut c = Cookie::new(name.to_string(), value);
    c.set_path("/");
    c.set_http_only(true);
    c.set_same_site(cookie::SameSite::Lax);
    c
}

// Expired variant of the session cookie, so browsers drop it instead of
// keeping an empty value around.
fn removal_cookie(name: &str) -> Cookie<'static> {
    let mut c = session_cookie(name, String::new());
    c.make_removal();
    c
}

fn token_response(tokens: AuthTokens) -> Response {
    let access_cookie = session_cookie("access_token", tokens.access_token.clone());
    let refresh_cookie = session_cookie("refresh_token", tokens.refresh_token);

    let mut response = Json(json!({
        "access_token": tokens.access_token,
    }))
    .into_response();
    if let Ok(hv) = access_cookie.to_string().parse() {
        response.headers_mut().append(header::SET_COOKIE, hv);
    }
    if let Ok(hv) = refresh_cookie.to_string().parse() {
        response.headers_mut().append(header::SET_COOKIE, hv);
    }
    response
}

async fn forward_auth(path: &str, body: Value) -> Result<AuthTokens, (StatusCode, Json<Value>)> {
    let url = format!("{}{}", auth_base_url().trim_end_matches('/'), path);
    let client = reqwest::Client::new();

    let resp = client.post(&url).json(&body).send().await.map_err(|e| {
        error!("Auth upstream unreachable at {}: {}", url, e);
        (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": "auth_unreachable" })),
        )
    })?;

    let status = resp.status();
    if !status.is_success() {
        warn!("Auth upstream returned {} for {}", status, path);
        return Err((
            StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY),
            Json(json!({ "error": "auth_failed" })),
        ));
    }

    let body_text = resp.text().await.unwrap_or_default();
    match serde_json::from_str::<AuthServiceResponse>(&body_text) {
        Ok(wrapper) => Ok(wrapper.data),
        Err(e) => {
            error!("Cannot parse auth response: {}", e);
            Err((
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "auth_parse_failed" })),
            ))
        }
    }
}

pub async fn login_handler(
    Json(body): Json<LoginBody>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    let tokens = forward_auth(
        "/api/v1/auth/login",
        json!({
            "email": body.email,
            "password": body.password,
        }),
    )
    .await?;

    Ok(token_response(tokens))
}

pub async fn register_handler(
    Json(body): Json<RegisterBody>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    // Provider signups must carry their business details; the profile row
    // is created by the auth upstream from this payload.
    if body.is_provider && body.business_name.as_deref().unwrap_or("").trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "missing_business_name" })),
        ));
    }

    let tokens = forward_auth(
        "/api/v1/auth/register",
        json!({
            "email": body.email,
            "password": body.password,
            "name": body.name,
            "is_provider": body.is_provider,
            "business_name": body.business_name,
            "category": body.category,
            "experience": body.experience,
        }),
    )
    .await?;

    Ok(token_response(tokens))
}

pub async fn logout_handler() -> Response {
    // Clear cookies
    let access_cookie = removal_cookie("access_token");
    let refresh_cookie = removal_cookie("refresh_token");

    let mut response = Json(json!({ "ok": true })).into_response();
    if let Ok(hv) = access_cookie.to_string().parse() {
        response.headers_mut().append(header::SET_COOKIE, hv);
    }
    if let Ok(hv) = refresh_cookie.to_string().parse() {
        response.headers_mut().append(header::SET_COOKIE, hv);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logout_cookies_expire_immediately() {
        for name in ["access_token", "refresh_token"] {
            let c = removal_cookie(name);
            let header = c.to_string();
            assert!(header.starts_with(&format!("{}=", name)));
            assert!(header.contains("Max-Age=0"), "got {}", header);
        }
    }

    #[test]
    fn session_cookies_are_http_only() {
        let header = session_cookie("access_token", "tok".to_string()).to_string();
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("SameSite=Lax"));
        assert!(header.contains("Path=/"));
    }
}
