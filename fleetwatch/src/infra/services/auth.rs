use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use fleetwatch_model::{
    PhoneNumber, SendOtpRequest, VerifyOtpRequest, VerifyOtpResponse,
};
use log::info;

use crate::infra::api_client::{ApiClient, ApiError, ApiResult};
use crate::infra::credential::Credential;

pub const SEND_OTP_PATH: &str = "/auth/send-otp";
pub const VERIFY_OTP_PATH: &str = "/auth/verify-otp";

/// Phone + one-time-code sign-in.
#[async_trait]
pub trait AuthApi: Send + Sync + Debug {
    async fn send_otp(&self, phone: &PhoneNumber) -> ApiResult<()>;

    /// Exchange a code for a bearer credential.
    async fn verify_otp(
        &self,
        phone: &PhoneNumber,
        code: &str,
    ) -> ApiResult<Credential>;
}

#[derive(Debug, Clone)]
pub struct AuthApiAdapter {
    client: Arc<ApiClient>,
}

impl AuthApiAdapter {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthApi for AuthApiAdapter {
    async fn send_otp(&self, phone: &PhoneNumber) -> ApiResult<()> {
        let body = SendOtpRequest {
            phone: phone.clone(),
        };
        self.client.post_public_discard(SEND_OTP_PATH, &body).await?;
        info!("Requested OTP for {}", phone);
        Ok(())
    }

    async fn verify_otp(
        &self,
        phone: &PhoneNumber,
        code: &str,
    ) -> ApiResult<Credential> {
        let body = VerifyOtpRequest {
            phone: phone.clone(),
            code: code.trim().to_string(),
        };
        let response: VerifyOtpResponse =
            self.client.post_public(VERIFY_OTP_PATH, &body).await?;
        info!("OTP verified for {}", phone);
        Credential::from_token(response.token).ok_or(ApiError::Unauthorized)
    }
}
