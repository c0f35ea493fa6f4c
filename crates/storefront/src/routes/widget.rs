//! Widget route handlers.
//!
//! The widget is served as an HTMX fragment the theme embeds on product and
//! cart pages. Every response re-renders the fragment from the shopper's
//! current view state; the synchronizer id lives in the session cookie.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{Query, State},
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use eco_packaging_core::PackagingChoice;

use crate::error::{AppError, Result};
use crate::middleware::session_keys;
use crate::state::AppState;
use crate::sync::strings::{self, WidgetStrings};
use crate::sync::{PageContext, SyncHandle, SyncOutcome, WidgetViewState};

/// Response header carrying the synchronization outcome label.
pub const OUTCOME_HEADER: &str = "x-sync-outcome";

/// Page parameter naming the hosting page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageParam {
    Product,
    #[default]
    Cart,
}

impl PageParam {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Cart => "cart",
        }
    }
}

impl From<PageParam> for PageContext {
    fn from(param: PageParam) -> Self {
        match param {
            PageParam::Product => Self::Product,
            PageParam::Cart => Self::Cart,
        }
    }
}

/// Query parameters for fragment requests.
#[derive(Debug, Deserialize)]
pub struct WidgetQuery {
    #[serde(default)]
    pub page: PageParam,
}

/// Choice form data posted by the widget radios.
#[derive(Debug, Deserialize)]
pub struct ChoiceForm {
    pub choice: String,
    #[serde(default)]
    pub page: PageParam,
}

/// Widget fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "widget/widget.html")]
pub struct WidgetTemplate {
    pub title: &'static str,
    pub standard_label: &'static str,
    pub minimal_label: &'static str,
    pub minimal_hint: &'static str,
    pub badge_text: &'static str,
    pub updating_text: &'static str,
    pub page: &'static str,
    pub standard_checked: bool,
    pub minimal_checked: bool,
    pub badge_visible: bool,
    pub loading: bool,
    pub status: Option<StatusView>,
    pub eligibility_notice: Option<String>,
}

/// Status display data for the template.
pub struct StatusView {
    pub kind: &'static str,
    pub text: String,
}

fn render_widget(
    page: PageParam,
    strings: &'static WidgetStrings,
    view: &WidgetViewState,
) -> WidgetTemplate {
    WidgetTemplate {
        title: strings.title,
        standard_label: strings.standard_label,
        minimal_label: strings.minimal_label,
        minimal_hint: strings.minimal_hint,
        badge_text: strings.badge,
        updating_text: strings.updating,
        page: page.as_str(),
        // Standard is the markup default until a choice is known.
        standard_checked: view.choice != Some(PackagingChoice::Minimal),
        minimal_checked: view.choice == Some(PackagingChoice::Minimal),
        badge_visible: view.badge_visible,
        loading: view.loading,
        status: view.status.as_ref().map(|status| StatusView {
            kind: status.kind.as_str(),
            text: status.text.clone(),
        }),
        eligibility_notice: view.eligibility_notice.clone(),
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the synchronizer id from the session, minting one on first use.
async fn sync_session_id(session: &Session) -> Result<String> {
    if let Some(id) = session.get::<String>(session_keys::SYNC_ID).await? {
        return Ok(id);
    }
    let id = Uuid::new_v4().to_string();
    session.insert(session_keys::SYNC_ID, id.clone()).await?;
    Ok(id)
}

async fn widget_handle(
    state: &AppState,
    session: &Session,
    page: PageParam,
) -> Result<SyncHandle> {
    let id = sync_session_id(session).await?;
    Ok(state.registry().get_or_create(&id, page.into())?)
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the widget fragment.
///
/// Restores the shopper's saved choice before rendering, so the first
/// render already reflects a choice made earlier or on another device.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<WidgetQuery>,
) -> Result<WidgetTemplate> {
    let handle = widget_handle(&state, &session, query.page).await?;
    handle.sync.restore_state().await;

    let strings = strings::for_language(state.config().widget.language);
    Ok(render_widget(query.page, strings, &handle.view.snapshot()))
}

/// Apply a packaging choice (HTMX form post).
///
/// Returns the refreshed fragment. The sync outcome label is exposed in the
/// `x-sync-outcome` header; a successful cart write additionally fires the
/// `cart-updated` HTMX trigger so other fragments can refresh themselves.
#[instrument(skip(state, session))]
pub async fn choose(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ChoiceForm>,
) -> Result<Response> {
    let choice = form
        .choice
        .parse::<PackagingChoice>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let handle = widget_handle(&state, &session, form.page).await?;
    let outcome = handle.sync.handle_choice_change(choice).await;

    let strings = strings::for_language(state.config().widget.language);
    let template = render_widget(form.page, strings, &handle.view.snapshot());

    let response = if matches!(outcome, SyncOutcome::Applied { .. }) {
        (
            AppendHeaders([
                ("HX-Trigger", "cart-updated"),
                (OUTCOME_HEADER, outcome.label()),
            ]),
            template,
        )
            .into_response()
    } else {
        (
            AppendHeaders([(OUTCOME_HEADER, outcome.label())]),
            template,
        )
            .into_response()
    };
    Ok(response)
}

/// Realign the widget after an external cart change.
///
/// Theme scripts post here from their cart events (drawer updates, add to
/// cart) instead of waiting for the next drift poll.
#[instrument(skip(state, session))]
pub async fn reconcile(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<WidgetQuery>,
) -> Result<WidgetTemplate> {
    let handle = widget_handle(&state, &session, form.page).await?;
    handle.sync.reconcile().await;

    let strings = strings::for_language(state.config().widget.language);
    Ok(render_widget(form.page, strings, &handle.view.snapshot()))
}

/// Current view state as JSON, for theme scripts that render natively.
#[derive(Debug, Serialize)]
pub struct WidgetStateResponse {
    pub choice: Option<PackagingChoice>,
    pub badge_visible: bool,
    pub loading: bool,
    pub status: Option<StatusPayload>,
    pub eligibility_notice: Option<String>,
}

/// Status payload within [`WidgetStateResponse`].
#[derive(Debug, Serialize)]
pub struct StatusPayload {
    pub kind: String,
    pub text: String,
}

#[instrument(skip(state, session))]
pub async fn view_state(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<WidgetQuery>,
) -> Result<Json<WidgetStateResponse>> {
    let handle = widget_handle(&state, &session, query.page).await?;
    let view = handle.view.snapshot();

    Ok(Json(WidgetStateResponse {
        choice: view.choice,
        badge_visible: view.badge_visible,
        loading: view.loading,
        status: view.status.map(|status| StatusPayload {
            kind: status.kind.as_str().to_string(),
            text: status.text,
        }),
        eligibility_notice: view.eligibility_notice,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use eco_packaging_core::Language;

    use super::*;
    use crate::sync::{StatusKind, StatusMessage};

    fn en() -> &'static WidgetStrings {
        strings::for_language(Language::En)
    }

    #[test]
    fn test_render_defaults_to_standard_checked() {
        let view = WidgetViewState::default();
        let html = render_widget(PageParam::Cart, en(), &view).render().unwrap();

        assert!(html.contains("value=\"standard\" checked"));
        assert!(!html.contains("value=\"minimal\" checked"));
        assert!(html.contains("data-eco-page=\"cart\""));
    }

    #[test]
    fn test_render_reflects_minimal_choice_and_badge() {
        let view = WidgetViewState {
            choice: Some(PackagingChoice::Minimal),
            badge_visible: true,
            ..WidgetViewState::default()
        };
        let html = render_widget(PageParam::Product, en(), &view).render().unwrap();

        assert!(html.contains("value=\"minimal\" checked"));
        assert!(html.contains("data-eco-packaging-badge"));
        assert!(html.contains("data-eco-page=\"product\""));
    }

    #[test]
    fn test_render_shows_status_and_notice() {
        let view = WidgetViewState {
            status: Some(StatusMessage {
                kind: StatusKind::Error,
                text: "Error: something broke".to_string(),
            }),
            eligibility_notice: Some("Discount not available for items in your cart".to_string()),
            ..WidgetViewState::default()
        };
        let html = render_widget(PageParam::Cart, en(), &view).render().unwrap();

        assert!(html.contains("eco-packaging__status--error"));
        assert!(html.contains("Error: something broke"));
        assert!(html.contains("data-eco-packaging-notice"));
    }

    #[test]
    fn test_loading_disables_inputs() {
        let view = WidgetViewState {
            loading: true,
            ..WidgetViewState::default()
        };
        let html = render_widget(PageParam::Cart, en(), &view).render().unwrap();

        assert!(html.contains("disabled"));
        assert!(html.contains("data-eco-packaging-loading"));
    }
}
