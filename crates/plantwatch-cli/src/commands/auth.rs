use std::io::{self, IsTerminal};

use anyhow::anyhow;
use plantwatch_api_models::{ApiResponse, LoginRequest, LoginResponse, endpoints};
use plantwatch_ui::core::api::Method;
use plantwatch_ui::core::snapshot::SessionSnapshot;
use plantwatch_ui::{LoginOutcome, SessionError};
use tracing::info;

use crate::cli::{LoginArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{SessionSummary, render_session};

fn resolve_password(args: &LoginArgs) -> CliResult<String> {
    if let Some(value) = &args.password {
        if value.is_empty() {
            return Err(CliError::validation("password cannot be empty"));
        }
        return Ok(value.clone());
    }

    if io::stdin().is_terminal() {
        let pass = rpassword::prompt_password("Password: ").map_err(|err| {
            CliError::failure(anyhow!("failed to read password from stdin: {err}"))
        })?;
        if pass.is_empty() {
            return Err(CliError::validation("password cannot be empty"));
        }
        Ok(pass)
    } else {
        Err(CliError::validation(
            "password required; supply via --password or PLANTWATCH_PASSWORD when running non-interactively",
        ))
    }
}

pub(crate) async fn handle_login(ctx: &AppContext, args: &LoginArgs) -> CliResult<()> {
    let email = args.email.trim().to_string();
    if email.is_empty() {
        return Err(CliError::validation("email cannot be empty"));
    }
    let password = resolve_password(args)?;
    let body = serde_json::to_value(LoginRequest { email, password })
        .map_err(|err| CliError::failure(anyhow!("failed to encode login request: {err}")))?;

    let response: ApiResponse<LoginResponse> = ctx
        .call(Method::Post, endpoints::LOGIN, Some(&body))
        .await?;

    match ctx.session.apply_login(response.data) {
        Ok(LoginOutcome::Authenticated) => {
            let user = ctx.session.auth().user().unwrap_or_default();
            let who = user.name.or(user.email).unwrap_or_else(|| "user".to_string());
            info!("login completed");
            println!("Logged in as {who}.");
            Ok(())
        }
        Ok(LoginOutcome::TwoFactorPending) => {
            println!("Second factor required; finish verification to start the session.");
            Ok(())
        }
        Err(err @ SessionError::MissingToken) => Err(CliError::failure(err)),
    }
}

pub(crate) fn handle_logout(ctx: &AppContext) {
    ctx.session.end();
    println!("Logged out.");
}

pub(crate) fn handle_whoami(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    let snapshot = SessionSnapshot::capture(&ctx.session);
    let summary = SessionSummary {
        authenticated: snapshot.auth.is_authenticated,
        two_factor_pending: snapshot.auth.is_2fa,
        super_admin: snapshot.super_admin,
        user: snapshot.auth.user,
        hierarchy: snapshot.hierarchy,
    };
    render_session(&summary, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::context_with;
    use httpmock::prelude::*;
    use plantwatch_ui::HierarchyLevel;
    use serde_json::json;
    use tempfile::TempDir;

    fn login_args() -> LoginArgs {
        LoginArgs {
            email: " ops@example.com ".to_string(),
            password: Some("secret".to_string()),
        }
    }

    #[test]
    fn resolve_password_prefers_flag_value() -> CliResult<()> {
        assert_eq!(resolve_password(&login_args())?, "secret");
        let empty = LoginArgs {
            password: Some(String::new()),
            ..login_args()
        };
        assert_eq!(resolve_password(&empty).map_err(|err| err.exit_code()), Err(2));
        Ok(())
    }

    #[tokio::test]
    async fn login_persists_session_and_seeds_hierarchy() -> CliResult<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/auth/login")
                .json_body(json!({"email": "ops@example.com", "password": "secret"}));
            then.status(200).json_body(json!({
                "trackingId": "t-1",
                "data": {
                    "user": {
                        "id": 7,
                        "name": "Operator",
                        "account": {"id": 5, "description": "Acme"},
                        "area": {"id": 12, "description": "Boilers"}
                    },
                    "token": "tok",
                    "menu": []
                }
            }));
        });
        let dir = TempDir::new().expect("tempdir");
        let ctx = context_with(&server, dir.path());

        handle_login(&ctx, &login_args()).await?;
        mock.assert();

        let reopened = context_with(&server, dir.path());
        assert_eq!(reopened.session.auth().token().as_deref(), Some("tok"));
        let account = reopened.session.hierarchy().level(HierarchyLevel::Account);
        assert!(account.readonly);
        assert_eq!(account.id, Some(5));
        assert!(!reopened.session.hierarchy().plant().is_set());
        assert_eq!(reopened.session.hierarchy().area().id, Some(12));
        Ok(())
    }

    #[tokio::test]
    async fn two_factor_login_leaves_session_pending() -> CliResult<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(200).json_body(json!({
                "data": {"user": {"id": 7}, "requiresTwoFactor": true}
            }));
        });
        let dir = TempDir::new().expect("tempdir");
        let ctx = context_with(&server, dir.path());

        handle_login(&ctx, &login_args()).await?;
        assert!(ctx.session.auth().is_two_factor_pending());
        assert!(!ctx.session.auth().is_authenticated());
        assert!(ctx.session.hierarchy().snapshot().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn rejected_credentials_are_validation_errors() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(400)
                .json_body(json!({"message": "Invalid credentials"}));
        });
        let dir = TempDir::new().expect("tempdir");
        let ctx = context_with(&server, dir.path());

        let err = handle_login(&ctx, &login_args()).await.expect_err("rejected");
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.display_message(), "Invalid credentials");
    }

    #[tokio::test]
    async fn logout_removes_persisted_state() {
        let server = MockServer::start_async().await;
        let dir = TempDir::new().expect("tempdir");
        let ctx = context_with(&server, dir.path());
        ctx.session
            .complete_login(plantwatch_api_models::User::default(), "tok", &[]);
        ctx.session.hierarchy().update_plant(2, "North");

        handle_logout(&ctx);

        let reopened = context_with(&server, dir.path());
        assert!(!reopened.session.auth().is_authenticated());
        assert!(reopened.session.hierarchy().snapshot().is_empty());
        assert!(handle_whoami(&reopened, OutputFormat::Json).is_ok());
    }
}
