//! Commands Module
//!
//! Operations exposed to front ends. Each one reports failures through the
//! notification list and returns a flat, serializable result.

use serde::Serialize;
use tracing::{debug, error, info};

use crate::http::{ApiError, ApiResult, Outcome};
use crate::models::{FullTeacherProfile, JobPosting, PaymentReceipt, PricingPlan, UserProfile};
use crate::navigation::{route_after_login, Navigator};
use crate::AppContext;

// Response types for front ends

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user_id: i64,
    pub display_name: String,
    pub role_name: String,
    pub redirect: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub success: bool,
    pub redirect: Option<String>,
    pub user: Option<UserProfile>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSummary {
    pub success: bool,
    pub balance: Option<u64>,
    pub plans: Vec<PricingPlan>,
    /// Stripe publishable key for confirming card payments
    pub publishable_key: Option<String>,
    pub error: Option<String>,
}

// Commands

/// Restore a session from storage
pub fn get_stored_session(ctx: &AppContext) -> Option<SessionResponse> {
    debug!("Getting stored session");

    if !ctx.session.hydrate() {
        debug!("No stored session found");
        return None;
    }

    let user = ctx.session.user()?;
    Some(SessionResponse {
        user_id: user.user_id,
        display_name: user.display_name(),
        redirect: route_after_login(&user).to_string(),
        role_name: user.role_name,
    })
}

/// Authenticate and navigate to the user's next onboarding step
pub async fn login(ctx: &AppContext, email: &str, password: &str) -> LoginResult {
    match ctx.auth.login(email, password).await {
        Ok(response) => {
            let user = response.data.user;
            let redirect = route_after_login(&user);

            ctx.session.login(user.clone(), response.data.token);
            ctx.router.navigate(redirect);
            ctx.notifications
                .success(format!("Welcome back, {}", user.display_name()));

            LoginResult {
                success: true,
                redirect: Some(redirect.to_string()),
                user: Some(user),
                error: None,
            }
        }
        Err(e) => {
            error!("Login failed: {}", e);
            ctx.notifications.error(e.to_string());
            LoginResult {
                success: false,
                redirect: None,
                user: None,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Logout and clear the session
pub fn logout(ctx: &AppContext) {
    ctx.session.logout();
    ctx.notifications.clear_notifications();
}

/// Route guard: a missing or expired token ends the session
pub fn ensure_authenticated(ctx: &AppContext) -> Result<(), ApiError> {
    if ctx.session.is_token_valid() {
        return Ok(());
    }
    info!("Session token missing or expired");
    ctx.session.force_logout();
    Err(ApiError::Unauthorized)
}

/// Requirement board for the dashboard
pub async fn dashboard(ctx: &AppContext) -> Outcome<Vec<JobPosting>> {
    if let Err(e) = ensure_authenticated(ctx) {
        return Outcome::failure(e);
    }
    report(ctx, ctx.jobs.list().await, None)
}

/// Tutor wizard data in one call
pub async fn teacher_profile(ctx: &AppContext) -> Outcome<FullTeacherProfile> {
    if let Err(e) = ensure_authenticated(ctx) {
        return Outcome::failure(e);
    }
    report(ctx, ctx.profile.full_teacher_profile().await, None)
}

/// Balance and pricing plans, fetched together.
///
/// When the balance request fails the last cached balance is shown instead.
pub async fn wallet_summary(ctx: &AppContext) -> WalletSummary {
    if let Err(e) = ensure_authenticated(ctx) {
        return WalletSummary {
            success: false,
            balance: None,
            plans: Vec::new(),
            publishable_key: None,
            error: Some(e.to_string()),
        };
    }

    let (balance, plans) = tokio::join!(ctx.wallet.balance(), ctx.wallet.pricing_plans());

    let mut failure = None;
    let balance = match balance {
        Ok(b) => Some(b.data.balance),
        Err(e) => {
            failure = Some(e);
            ctx.wallet.cached_balance()
        }
    };
    let plans = match plans {
        Ok(p) => p.data,
        Err(e) => {
            failure.get_or_insert(e);
            Vec::new()
        }
    };

    if let Some(e) = &failure {
        error!("Wallet summary incomplete: {}", e);
        ctx.notifications.error(e.to_string());
    }

    WalletSummary {
        success: failure.is_none(),
        balance,
        plans,
        publishable_key: ctx.config.stripe_public_key.clone(),
        error: failure.map(|e| e.to_string()),
    }
}

/// Card purchase of a coin plan
pub async fn buy_coins(
    ctx: &AppContext,
    plan_id: i64,
    payment_method_id: &str,
) -> Outcome<PaymentReceipt> {
    if let Err(e) = ensure_authenticated(ctx) {
        return Outcome::failure(e);
    }
    report(
        ctx,
        ctx.wallet.buy_coins(plan_id, payment_method_id).await,
        Some("Coins purchased successfully"),
    )
}

fn report<T>(ctx: &AppContext, result: ApiResult<T>, success_message: Option<&str>) -> Outcome<T> {
    match &result {
        Ok(_) => {
            if let Some(message) = success_message {
                ctx.notifications.success(message);
            }
        }
        Err(e) => {
            error!("Request failed: {}", e);
            ctx.notifications.error(e.to_string());
        }
    }
    result.into()
}
