//! # Authentication & Authorization Middleware
//!
//! Bearer token middleware with role-based access control.
//!
//! ## Token Format
//!
//! Bearer tokens encode role and organization binding:
//!
//! ```text
//! Bearer {role}:{organization_id}:{secret}   — scoped format
//! Bearer {secret}                             — legacy format (treated as Admin)
//! ```
//!
//! ## CallerIdentity
//!
//! Every authenticated request gets a [`CallerIdentity`] injected into the
//! request extensions. Handlers extract it via the `FromRequestParts` impl.
//! The organization binding is the tenant key for every store read the
//! handler performs; an unbound caller (an `Admin` operating across
//! organizations) names the target organization per request instead.

use axum::extract::Request;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use utoipa::ToSchema;
use uuid::Uuid;

use skl_core::OrganizationId;

use crate::error::{AppError, ErrorBody, ErrorDetail};

// ── Role ────────────────────────────────────────────────────────────────────

/// Roles in the compliance stack, ordered by privilege level.
///
/// The `Ord` derivation respects variant declaration order:
/// `Member < Dpo < Admin`. This enables `>=` comparison for role-based
/// access checks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Can read their organization's records and alert feed.
    Member,
    /// Data protection officer: can create and update records.
    Dpo,
    /// Full access, including deletion and cross-organization reads.
    Admin,
}

impl Role {
    /// Return the string representation of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Dpo => "dpo",
            Self::Admin => "admin",
        }
    }
}

// ── CallerIdentity ──────────────────────────────────────────────────────────

/// Identity of the authenticated caller, extracted from the auth context
/// and available to all route handlers via Axum's `FromRequestParts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// The caller's role in the system.
    pub role: Role,
    /// The organization the caller is bound to. `None` for unscoped Admin
    /// tokens, which name the target organization per request.
    pub organization_id: Option<OrganizationId>,
}

impl CallerIdentity {
    /// Check if the caller has at least the given minimum role.
    ///
    /// Since `Role` derives `Ord` with `Member < Dpo < Admin`, this is a
    /// single comparison.
    pub fn has_role(&self, minimum: Role) -> bool {
        self.role >= minimum
    }
}

impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("no caller identity in request context".into()))
    }
}

/// Check that the caller has at least the required role.
/// Returns 403 Forbidden if the caller's role is insufficient.
pub fn require_role(caller: &CallerIdentity, minimum: Role) -> Result<(), AppError> {
    if caller.has_role(minimum) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "role '{}' required, caller has '{}'",
            minimum.as_str(),
            caller.role.as_str()
        )))
    }
}

// ── Organization scoping ────────────────────────────────────────────────────

/// Query parameters for organization scoping.
///
/// Callers bound to an organization by their token ignore this; unbound
/// Admin tokens must name the target organization here.
#[derive(Debug, Default, Deserialize)]
pub struct OrgScope {
    /// Target organization for unscoped Admin tokens.
    pub organization_id: Option<Uuid>,
}

impl OrgScope {
    /// Resolve the organization every store read in this request is scoped
    /// to. A token binding always wins; the query parameter applies only to
    /// unbound Admin callers.
    pub fn resolve(&self, caller: &CallerIdentity) -> Result<OrganizationId, AppError> {
        if let Some(bound) = caller.organization_id {
            return Ok(bound);
        }
        match self.organization_id {
            Some(org) if caller.role == Role::Admin => Ok(OrganizationId(org)),
            Some(_) => Err(AppError::Forbidden(
                "organization override requires admin role".into(),
            )),
            None => Err(AppError::BadRequest(
                "token carries no organization binding; pass ?organization_id=".into(),
            )),
        }
    }
}

// ── Auth Configuration ──────────────────────────────────────────────────────

/// Auth configuration injected into request extensions.
///
/// Custom `Debug` redacts the token value to prevent credential leakage in logs.
#[derive(Clone)]
pub struct AuthConfig {
    pub token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ── Token Validation ────────────────────────────────────────────────────────

/// Constant-time comparison of bearer tokens.
///
/// Prevents timing side-channels that could reveal token length or prefix.
/// When lengths differ, performs a dummy comparison to avoid leaking length
/// information through timing variance.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Parse the bearer token in format `{role}:{organization_id}:{secret}` or
/// `{secret}` (legacy).
///
/// Legacy tokens (without role prefix) are treated as unscoped `Admin` for
/// backward compatibility with existing deployments.
pub fn parse_bearer_token(provided: &str, expected_secret: &str) -> Result<CallerIdentity, String> {
    let parts: Vec<&str> = provided.splitn(3, ':').collect();

    match parts.len() {
        // Legacy format: just the secret.
        1 => {
            if constant_time_token_eq(provided, expected_secret) {
                Ok(CallerIdentity {
                    role: Role::Admin,
                    organization_id: None,
                })
            } else {
                Err("invalid bearer token".into())
            }
        }
        // Scoped format: role:organization_id:secret (organization may be empty)
        3 => {
            let role_str = parts[0];
            let org_str = parts[1];
            let secret = parts[2];

            if !constant_time_token_eq(secret, expected_secret) {
                return Err("invalid bearer token".into());
            }

            let role = match role_str {
                "admin" => Role::Admin,
                "dpo" => Role::Dpo,
                "member" => Role::Member,
                other => return Err(format!("unknown role: {other}")),
            };

            let organization_id = if org_str.is_empty() {
                // Only Admin may operate without an organization binding.
                if role != Role::Admin {
                    return Err(format!(
                        "role '{}' requires an organization binding",
                        role.as_str()
                    ));
                }
                None
            } else {
                Some(
                    OrganizationId::parse(org_str)
                        .map_err(|e| format!("invalid organization_id: {e}"))?,
                )
            };

            Ok(CallerIdentity {
                role,
                organization_id,
            })
        }
        _ => Err("invalid token format — expected {role}:{organization_id}:{secret} or {secret}"
            .into()),
    }
}

// ── Middleware ───────────────────────────────────────────────────────────────

/// Extract and validate the Bearer token from the Authorization header.
///
/// Parses the token to extract `CallerIdentity` (role + organization
/// binding) and injects it into request extensions for downstream handlers.
///
/// When `AuthConfig.token` is `None`, all requests are allowed with an
/// unscoped `Admin` identity (auth disabled / development mode).
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let expected_token = request.extensions().get::<AuthConfig>().cloned();

    match expected_token {
        Some(AuthConfig {
            token: Some(ref expected),
        }) => {
            let auth_header = request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok());

            match auth_header {
                Some(header_value) if header_value.starts_with("Bearer ") => {
                    let provided = &header_value[7..];
                    match parse_bearer_token(provided, expected) {
                        Ok(identity) => {
                            request.extensions_mut().insert(identity);
                            next.run(request).await
                        }
                        Err(msg) => {
                            tracing::warn!(reason = %msg, "authentication failed: invalid bearer token");
                            unauthorized_response(&msg)
                        }
                    }
                }
                Some(_) => {
                    tracing::warn!("authentication failed: non-Bearer authorization scheme");
                    unauthorized_response("authorization header must use Bearer scheme")
                }
                None => {
                    tracing::warn!("authentication failed: missing authorization header");
                    unauthorized_response("missing authorization header")
                }
            }
        }
        _ => {
            // Auth disabled — inject unscoped Admin identity for full access.
            request.extensions_mut().insert(CallerIdentity {
                role: Role::Admin,
                organization_id: None,
            });
            next.run(request).await
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            details: None,
        },
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    /// Build a minimal router with the auth middleware and a simple handler.
    fn test_app(token: Option<String>) -> Router {
        let auth_config = AuthConfig { token };
        Router::new()
            .route("/test", get(|| async { "ok" }))
            .layer(from_fn(auth_middleware))
            .layer(axum::Extension(auth_config))
    }

    #[tokio::test]
    async fn valid_bearer_token_accepted() {
        let app = test_app(Some("my-secret".to_string()));

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Bearer my-secret")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_authorization_header_rejected() {
        let app = test_app(Some("my-secret".to_string()));

        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let err: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(err["error"]["code"], "UNAUTHORIZED");
        assert!(err["error"]["message"].as_str().unwrap().contains("missing"));
    }

    #[tokio::test]
    async fn invalid_token_rejected() {
        let app = test_app(Some("my-secret".to_string()));

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Bearer wrong-token")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn non_bearer_scheme_rejected() {
        let app = test_app(Some("my-secret".to_string()));

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn auth_disabled_allows_all_requests() {
        let app = test_app(None);

        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn constant_time_eq_rejects_prefix() {
        assert!(constant_time_token_eq("secret-token-123", "secret-token-123"));
        assert!(!constant_time_token_eq("secret", "secret-token-123"));
        assert!(!constant_time_token_eq("", "secret-token-123"));
    }

    // ── Role tests ───────────────────────────────────────────────

    #[test]
    fn role_ordering_is_correct() {
        assert!(Role::Member < Role::Dpo);
        assert!(Role::Dpo < Role::Admin);
    }

    #[test]
    fn require_role_passes_for_sufficient_role() {
        let caller = CallerIdentity {
            role: Role::Admin,
            organization_id: None,
        };
        assert!(require_role(&caller, Role::Dpo).is_ok());
    }

    #[test]
    fn require_role_fails_for_insufficient_role() {
        let caller = CallerIdentity {
            role: Role::Member,
            organization_id: Some(OrganizationId::new()),
        };
        assert!(require_role(&caller, Role::Dpo).is_err());
    }

    // ── parse_bearer_token tests ─────────────────────────────────

    #[test]
    fn parse_bearer_token_legacy_format() {
        let identity = parse_bearer_token("my-secret", "my-secret").unwrap();
        assert_eq!(identity.role, Role::Admin);
        assert!(identity.organization_id.is_none());
    }

    #[test]
    fn parse_bearer_token_scoped_format() {
        let org = OrganizationId::new();
        let token = format!("dpo:{}:my-secret", org.as_uuid());
        let identity = parse_bearer_token(&token, "my-secret").unwrap();
        assert_eq!(identity.role, Role::Dpo);
        assert_eq!(identity.organization_id, Some(org));
    }

    #[test]
    fn parse_bearer_token_unscoped_admin() {
        let identity = parse_bearer_token("admin::my-secret", "my-secret").unwrap();
        assert_eq!(identity.role, Role::Admin);
        assert!(identity.organization_id.is_none());
    }

    #[test]
    fn parse_bearer_token_unscoped_member_rejected() {
        let result = parse_bearer_token("member::my-secret", "my-secret");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("organization binding"));
    }

    #[test]
    fn parse_bearer_token_wrong_secret() {
        assert!(parse_bearer_token("admin::wrong", "my-secret").is_err());
    }

    #[test]
    fn parse_bearer_token_unknown_role() {
        let result = parse_bearer_token("superadmin::my-secret", "my-secret");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("unknown role"));
    }

    #[test]
    fn parse_bearer_token_invalid_org() {
        let result = parse_bearer_token("member:not-a-uuid:my-secret", "my-secret");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("invalid organization_id"));
    }

    #[test]
    fn parse_bearer_token_two_parts_rejected() {
        assert!(parse_bearer_token("role:secret", "secret").is_err());
    }

    // ── OrgScope tests ───────────────────────────────────────────

    #[test]
    fn org_scope_token_binding_wins() {
        let org = OrganizationId::new();
        let caller = CallerIdentity {
            role: Role::Member,
            organization_id: Some(org),
        };
        let scope = OrgScope {
            organization_id: Some(Uuid::new_v4()),
        };
        assert_eq!(scope.resolve(&caller).unwrap(), org);
    }

    #[test]
    fn org_scope_unbound_admin_uses_query() {
        let caller = CallerIdentity {
            role: Role::Admin,
            organization_id: None,
        };
        let target = Uuid::new_v4();
        let scope = OrgScope {
            organization_id: Some(target),
        };
        assert_eq!(scope.resolve(&caller).unwrap(), OrganizationId(target));
    }

    #[test]
    fn org_scope_unbound_admin_without_query_rejected() {
        let caller = CallerIdentity {
            role: Role::Admin,
            organization_id: None,
        };
        assert!(OrgScope::default().resolve(&caller).is_err());
    }

    // ── Middleware with scoped token format ──────────────────────

    #[tokio::test]
    async fn middleware_scoped_token_accepted() {
        let app = test_app(Some("my-secret".to_string()));
        let org = Uuid::new_v4();

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", format!("Bearer member:{org}:my-secret"))
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn middleware_unknown_role_rejected() {
        let app = test_app(Some("my-secret".to_string()));

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Bearer superadmin::my-secret")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
