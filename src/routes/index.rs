//! Landing page
//!
//! Serves the single HTML form: a textarea for pasted codes and a file
//! input for scanned labels. Embedded at compile time; there is no template
//! engine to configure for one static page.

use axum::response::Html;

pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../assets/index.html"))
}
