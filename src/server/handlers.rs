//! HTTP handlers for access decisions

use crate::access::{
    AccessDecision, FeatureGate, GateOutcome, PlanType, Role, SubscriptionEvaluator, SubscriptionState,
    SubscriptionStatus, User, classify,
};
use crate::navigation::{NavigationBundle, NavigationContext, Section};
use crate::server::AppState;
use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Health check payload
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub name: String,
    pub version: &'static str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationRequest {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub workspace_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationResponse {
    pub role: Option<Role>,
    pub plan: PlanType,
    pub subscription_status: Option<SubscriptionStatus>,
    pub loading: bool,
    pub navigation: NavigationBundle,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateRequest {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub required_plan: Option<PlanType>,
    #[serde(default)]
    pub show_upgrade: Option<bool>,
    #[serde(default)]
    pub upgrade_message: Option<String>,
    /// The caller has fallback content of its own
    #[serde(default)]
    pub has_fallback: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub account_id: Option<String>,
    pub path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<Section>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InvalidateResponse {
    pub invalidated: bool,
}

/// Subscription state for a signed-in user; anonymous callers are on the free plan
async fn subscription_for(
    state: &AppState,
    role: Option<Role>,
    account_id: Option<&str>,
) -> SubscriptionState {
    match role {
        Some(_) => state.subscriptions.state(account_id).await,
        None => state.subscriptions.state(None).await,
    }
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        name: state.service_name.to_string(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn navigation(
    State(state): State<AppState>,
    Json(req): Json<NavigationRequest>,
) -> Json<NavigationResponse> {
    let role = classify(req.user.as_ref());
    let subscription = subscription_for(&state, role, req.account_id.as_deref()).await;

    let bundle = state.navigation.resolve(&NavigationContext {
        role,
        workspace: req.workspace_id.as_deref(),
        subscription: &subscription,
    });

    let eval = SubscriptionEvaluator::new(&subscription);
    Json(NavigationResponse {
        role,
        plan: eval.current_plan(),
        subscription_status: eval.status(),
        loading: eval.is_loading(),
        navigation: bundle,
    })
}

pub async fn gate(
    State(state): State<AppState>,
    Json(req): Json<GateRequest>,
) -> Json<GateOutcome<()>> {
    let role = classify(req.user.as_ref());
    let subscription = subscription_for(&state, role, req.account_id.as_deref()).await;

    let defaults = FeatureGate::default();
    let gate = FeatureGate {
        required_plan: req.required_plan.unwrap_or(defaults.required_plan),
        upgrade_message: req.upgrade_message,
        show_upgrade: req.show_upgrade.unwrap_or(defaults.show_upgrade),
    };

    let outcome = gate.evaluate(&subscription, req.has_fallback.then_some(()));
    debug!(required = %gate.required_plan, granted = outcome.is_granted(), "Gate evaluated");
    Json(outcome)
}

pub async fn route(
    State(state): State<AppState>,
    Json(req): Json<RouteRequest>,
) -> Json<RouteResponse> {
    let role = classify(req.user.as_ref());
    let subscription = subscription_for(&state, role, req.account_id.as_deref()).await;

    let check = state
        .routes
        .check(&req.path, role, &subscription, &state.navigation);
    let response = match check.decision {
        AccessDecision::Allowed => RouteResponse {
            allowed: true,
            section: check.section,
            reason: None,
        },
        AccessDecision::Denied(denied) => RouteResponse {
            allowed: false,
            section: check.section,
            reason: Some(denied.reason),
        },
    };
    Json(response)
}

pub async fn invalidate_subscription(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Json<InvalidateResponse> {
    let invalidated = state.subscriptions.invalidate(&account_id).await;
    info!(account_id = %account_id, invalidated, "Subscription cache invalidated");
    Json(InvalidateResponse { invalidated })
}
