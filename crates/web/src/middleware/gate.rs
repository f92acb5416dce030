//! Role-gated page access.
//!
//! [`Gate<P>`] runs the page gate for policy `P` before the handler: the
//! handler only runs for a live session whose role the policy allows.
//! Everything else becomes a 303 redirect (login, `/unauthorized`, or the
//! role's own view of the page).

use std::marker::PhantomData;

use axum::extract::{FromRequestParts, OriginalUri};
use axum::http::request::Parts;
use axum::http::Method;
use axum::response::{IntoResponse, Redirect, Response};
use safewatch_core::access::{evaluate, GateOutcome, PagePolicy, UNAUTHORIZED_PATH};

use super::session::{read_session, SessionUser};
use crate::auth::session::removal_cookie;
use crate::response::{login_path, redirect_with_cookies};
use crate::state::AppState;

/// A page access policy, as a type so it can parameterize [`Gate`].
pub trait PageAccess: Send + Sync + 'static {
    const POLICY: PagePolicy;
}

/// Any signed-in role.
pub struct SignedIn;

/// Admins only.
pub struct AdminOnly;

/// Safety officers and admins.
pub struct SafetyTeam;

/// Managers, safety officers and admins.
pub struct Supervisors;

/// Full incident register; other roles see their own incidents.
pub struct IncidentRegister;

/// Full hazard register; other roles see their own hazards.
pub struct HazardRegister;

/// All VPC reports; other roles see their own.
pub struct VpcRegister;

/// All corrective actions; other roles see the ones assigned to them.
pub struct ActionRegister;

impl PageAccess for SignedIn {
    const POLICY: PagePolicy = PagePolicy::SIGNED_IN;
}

impl PageAccess for AdminOnly {
    const POLICY: PagePolicy = PagePolicy::ADMIN;
}

impl PageAccess for SafetyTeam {
    const POLICY: PagePolicy = PagePolicy::SAFETY;
}

impl PageAccess for Supervisors {
    const POLICY: PagePolicy = PagePolicy::SUPERVISOR;
}

impl PageAccess for IncidentRegister {
    const POLICY: PagePolicy = PagePolicy::supervisor_or("/incidents/my");
}

impl PageAccess for HazardRegister {
    const POLICY: PagePolicy = PagePolicy::supervisor_or("/hazards/my");
}

impl PageAccess for VpcRegister {
    const POLICY: PagePolicy = PagePolicy::supervisor_or("/vpcs/my");
}

impl PageAccess for ActionRegister {
    const POLICY: PagePolicy = PagePolicy::supervisor_or("/corrective-actions/assigned");
}

/// The session of a request that passed the gate for policy `P`.
///
/// ```ignore
/// async fn users_page(Gate(admin, _): Gate<AdminOnly>) -> AppResult<Json<()>> {
///     // admin.role is guaranteed to be `admin` here
///     Ok(Json(()))
/// }
/// ```
pub struct Gate<P>(pub SessionUser, pub PhantomData<P>);

/// Where a request that failed the gate is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateRejection {
    Login { callback_url: Option<String> },
    Unauthorized,
    Alternate(&'static str),
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        match self {
            GateRejection::Login { callback_url } => {
                redirect_with_cookies(&login_path(callback_url.as_deref(), None), &[removal_cookie()])
            }
            GateRejection::Unauthorized => Redirect::to(UNAUTHORIZED_PATH).into_response(),
            GateRejection::Alternate(path) => Redirect::to(path).into_response(),
        }
    }
}

impl<P: PageAccess> FromRequestParts<AppState> for Gate<P> {
    type Rejection = GateRejection;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|original| original.0.clone())
            .unwrap_or_else(|| parts.uri.clone());
        let path = uri.path();
        let target = uri.path_and_query().map_or(path, |pq| pq.as_str());

        let session = read_session(&parts.headers, &state.config.session);
        let now = chrono::Utc::now().timestamp();
        let outcome = evaluate(session.as_ref().map(SessionUser::status), now, path, &P::POLICY);

        match (outcome, session) {
            (GateOutcome::Render, Some(user)) => Ok(Gate(user, PhantomData)),
            (GateOutcome::Render, None) | (GateOutcome::Login { .. }, _) => {
                tracing::debug!(%path, "No live session, redirecting to login");
                // Only a page load makes sense to come back to.
                let callback_url = (parts.method == Method::GET).then(|| target.to_string());
                Err(GateRejection::Login { callback_url })
            }
            (GateOutcome::Unauthorized, user) => {
                tracing::debug!(%path, role = ?user.map(|u| u.role), "Role not allowed");
                Err(GateRejection::Unauthorized)
            }
            (GateOutcome::Alternate(alternate), _) => {
                tracing::debug!(%path, %alternate, "Sending role to its own view");
                Err(GateRejection::Alternate(alternate))
            }
        }
    }
}
