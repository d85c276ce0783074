use axum::{extract::State, response::Html};
use tera::Context;

use crate::{web::WebResult, AppState};

#[tracing::instrument(name = "Rendering the landing page", skip_all)]
pub async fn home(State(app_state): State<AppState>) -> WebResult<Html<String>> {
    let mut ctx = Context::new();
    ctx.insert("site", &app_state.site);

    let body = app_state
        .templ_mgr
        .render_html_to_string(&ctx, "index.html")?;

    Ok(Html(body))
}
