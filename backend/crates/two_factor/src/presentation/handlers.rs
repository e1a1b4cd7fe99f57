//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use config_store::{ConfigEntryRepository, ConfigStore};
use platform::clock::Clock;

use crate::application::config::TwoFactorConfig;
use crate::application::login_gate::{LoginChallenge, LoginGateUseCase};
use crate::application::send_code::SendCodeUseCase;
use crate::application::verify_code::VerifyCodeUseCase;
use crate::domain::mailer::CodeMailer;
use crate::domain::repository::TwoFactorCodeRepository;
use crate::error::TwoFactorResult;
use crate::presentation::dto::{
    BeginLoginRequest, BeginLoginResponse, CompleteLoginRequest, IssueCodeRequest,
    IssueCodeResponse, VerifyCodeRequest, VerifyCodeResponse,
};

/// Shared state for two-factor handlers
#[derive(Clone)]
pub struct TwoFactorAppState<C, R, M>
where
    C: ConfigEntryRepository + Clone + Send + Sync + 'static,
    R: TwoFactorCodeRepository + Clone + Send + Sync + 'static,
    M: CodeMailer + Clone + Send + Sync + 'static,
{
    pub config_store: ConfigStore<C>,
    pub repo: Arc<R>,
    pub mailer: Arc<M>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<TwoFactorConfig>,
}

/// POST /api/2fa/codes
pub async fn issue_code<C, R, M>(
    State(state): State<TwoFactorAppState<C, R, M>>,
    Json(req): Json<IssueCodeRequest>,
) -> TwoFactorResult<impl IntoResponse>
where
    C: ConfigEntryRepository + Clone + Send + Sync + 'static,
    R: TwoFactorCodeRepository + Clone + Send + Sync + 'static,
    M: CodeMailer + Clone + Send + Sync + 'static,
{
    let use_case = SendCodeUseCase::new(
        state.repo.clone(),
        state.mailer.clone(),
        state.clock.clone(),
        state.config.clone(),
    );

    let output = use_case.execute(&req.email, req.purpose).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(IssueCodeResponse {
            expires_at_ms: output.expires_at.timestamp_millis(),
        }),
    ))
}

/// POST /api/2fa/codes/verify
pub async fn verify_code<C, R, M>(
    State(state): State<TwoFactorAppState<C, R, M>>,
    Json(req): Json<VerifyCodeRequest>,
) -> TwoFactorResult<Json<VerifyCodeResponse>>
where
    C: ConfigEntryRepository + Clone + Send + Sync + 'static,
    R: TwoFactorCodeRepository + Clone + Send + Sync + 'static,
    M: CodeMailer + Clone + Send + Sync + 'static,
{
    let use_case = VerifyCodeUseCase::new(
        state.repo.clone(),
        state.clock.clone(),
        state.config.clone(),
    );

    use_case
        .verify_latest(&req.email, req.purpose, &req.code)
        .await?;

    Ok(Json(VerifyCodeResponse { verified: true }))
}

/// POST /api/2fa/login/begin
pub async fn begin_login<C, R, M>(
    State(state): State<TwoFactorAppState<C, R, M>>,
    Json(req): Json<BeginLoginRequest>,
) -> TwoFactorResult<Json<BeginLoginResponse>>
where
    C: ConfigEntryRepository + Clone + Send + Sync + 'static,
    R: TwoFactorCodeRepository + Clone + Send + Sync + 'static,
    M: CodeMailer + Clone + Send + Sync + 'static,
{
    let response = match login_gate(&state).begin(&req.email).await? {
        LoginChallenge::NotRequired => BeginLoginResponse {
            two_factor_required: false,
            expires_at_ms: None,
        },
        LoginChallenge::CodeSent { expires_at } => BeginLoginResponse {
            two_factor_required: true,
            expires_at_ms: Some(expires_at.timestamp_millis()),
        },
    };

    Ok(Json(response))
}

/// POST /api/2fa/login/complete
pub async fn complete_login<C, R, M>(
    State(state): State<TwoFactorAppState<C, R, M>>,
    Json(req): Json<CompleteLoginRequest>,
) -> TwoFactorResult<Json<VerifyCodeResponse>>
where
    C: ConfigEntryRepository + Clone + Send + Sync + 'static,
    R: TwoFactorCodeRepository + Clone + Send + Sync + 'static,
    M: CodeMailer + Clone + Send + Sync + 'static,
{
    login_gate(&state).complete(&req.email, &req.code).await?;

    Ok(Json(VerifyCodeResponse { verified: true }))
}

fn login_gate<C, R, M>(state: &TwoFactorAppState<C, R, M>) -> LoginGateUseCase<C, R, M>
where
    C: ConfigEntryRepository + Clone + Send + Sync + 'static,
    R: TwoFactorCodeRepository + Clone + Send + Sync + 'static,
    M: CodeMailer + Clone + Send + Sync + 'static,
{
    LoginGateUseCase::new(
        state.config_store.clone(),
        state.repo.clone(),
        state.mailer.clone(),
        state.clock.clone(),
        state.config.clone(),
    )
}
