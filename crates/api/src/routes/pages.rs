//! Static HTML pages. The pages talk to the JSON API from the browser.

use axum::response::Html;

const LANDING_PAGE: &str = include_str!("../../static/index.html");
const LOGIN_PAGE: &str = include_str!("../../static/login.html");
const ADMIN_PAGE: &str = include_str!("../../static/admin.html");

/// GET /
pub async fn landing() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

/// GET /login
pub async fn login() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}

/// GET /admin
pub async fn admin() -> Html<&'static str> {
    Html(ADMIN_PAGE)
}
