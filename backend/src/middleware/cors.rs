use axum::{
    extract::{Request, State},
    http::{
        header::{ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE},
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

/// Origin echoed in `Access-Control-Allow-Origin`.
#[derive(Clone, Debug)]
pub struct AllowedOrigin(pub HeaderValue);

impl AllowedOrigin {
    pub fn new(origin: &str) -> anyhow::Result<Self> {
        Ok(Self(HeaderValue::from_str(origin)?))
    }
}

/// Answers every `OPTIONS` request with an empty 204 before routing, and
/// stamps the CORS and JSON content-type headers onto every response.
pub async fn cors(State(origin): State<AllowedOrigin>, req: Request, next: Next) -> Response {
    let mut response = if req.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };

    apply_headers(response.headers_mut(), &origin);
    response
}

pub fn apply_headers(headers: &mut HeaderMap, origin: &AllowedOrigin) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.0.clone());
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
}
