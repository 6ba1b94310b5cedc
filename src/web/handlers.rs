use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Extension, Form};
use serde::Deserialize;

use crate::domain::model::UserPreferences;
use crate::utils::error::SommelierError;
use crate::web::render::{render_page, Notice, Page, Tab, API_KEY_HINT};
use crate::web::session::SessionId;
use crate::web::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub tab: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CartForm {
    #[serde(default)]
    pub item: String,
    pub tab: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReturnForm {
    pub tab: Option<String>,
}

pub async fn index(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Query(query): Query<PageQuery>,
) -> Html<String> {
    let tab = Tab::parse(query.tab.as_deref());
    let context = state.sessions.snapshot(session.as_str());
    let search = query.q.unwrap_or_default();

    let mut page = Page::new(tab, &context);
    if tab == Tab::Browse {
        page.wines = Some(state.catalog.fetch_wines().await);
        page.search = &search;
    }

    Html(render_page(&page))
}

/// The body is decoded by hand because the taste checkboxes repeat the `taste` key.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    body: String,
) -> Html<String> {
    let pairs: Vec<(String, String)> = url::form_urlencoded::parse(body.as_bytes())
        .into_owned()
        .collect();

    let mut notices = Vec::new();
    match UserPreferences::from_form(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))) {
        Ok(prefs) => {
            state
                .sessions
                .with_session(session.as_str(), |ctx| ctx.preferences = prefs.clone());

            tracing::info!(
                "Requesting recommendations for {} ({} guests)",
                prefs.meal_type,
                prefs.guest_count
            );
            match state.sommelier.recommend(&prefs).await {
                Ok(text) => notices.push(Notice::Generated {
                    heading: "🎯 Sommelier's Recommendations",
                    text,
                }),
                Err(e) => {
                    tracing::error!("Recommendation request failed: {}", e);
                    notices.push(Notice::Error(format!(
                        "Error getting recommendations: {}",
                        e
                    )));
                    notices.push(Notice::Info(API_KEY_HINT.to_string()));
                }
            }
        }
        Err(e) => notices.push(Notice::Warning(e.user_friendly_message())),
    }

    let context = state.sessions.snapshot(session.as_str());
    let mut page = Page::new(Tab::Pairing, &context);
    page.notices = notices;
    Html(render_page(&page))
}

pub async fn ask(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Form(form): Form<AskForm>,
) -> Html<String> {
    let mut notices = Vec::new();
    match state.sommelier.answer(&form.question).await {
        Ok(text) => notices.push(Notice::Generated {
            heading: "🍷 Sommelier's Answer",
            text,
        }),
        Err(SommelierError::EmptyQuestion) => {
            notices.push(Notice::Warning(
                SommelierError::EmptyQuestion.user_friendly_message(),
            ));
        }
        Err(e) => {
            tracing::error!("Question request failed: {}", e);
            notices.push(Notice::Error(format!("Error: {}", e)));
            notices.push(Notice::Info(API_KEY_HINT.to_string()));
        }
    }

    let context = state.sessions.snapshot(session.as_str());
    let mut page = Page::new(Tab::Ask, &context);
    page.question = &form.question;
    page.notices = notices;
    Html(render_page(&page))
}

pub async fn add_to_cart(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Form(form): Form<CartForm>,
) -> Redirect {
    let item = form.item.trim();
    if !item.is_empty() {
        state
            .sessions
            .with_session(session.as_str(), |ctx| ctx.cart.add(item));
        tracing::debug!("Added '{}' to cart", item);
    }
    back_to(form.tab.as_deref())
}

pub async fn clear_cart(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Form(form): Form<ReturnForm>,
) -> Redirect {
    state
        .sessions
        .with_session(session.as_str(), |ctx| ctx.cart.clear());
    back_to(form.tab.as_deref())
}

/// "Learn More": remembers the wine at `index` of the merged catalog.
pub async fn select_wine(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Path(index): Path<usize>,
) -> Response {
    let wines = state.catalog.fetch_wines().await;
    match wines.get(index) {
        Some(wine) => {
            let wine = wine.clone();
            state
                .sessions
                .with_session(session.as_str(), |ctx| ctx.selected_wine = Some(wine));
            back_to(Some(Tab::Browse.slug())).into_response()
        }
        None => (StatusCode::NOT_FOUND, "Wine not found").into_response(),
    }
}

pub async fn health_check() -> &'static str {
    "ok"
}

fn back_to(tab: Option<&str>) -> Redirect {
    Redirect::to(&format!("/?tab={}", Tab::parse(tab).slug()))
}
