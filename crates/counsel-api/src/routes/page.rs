use axum::response::Html;

/// The single-page form, embedded at build time.
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../assets/index.html"))
}
