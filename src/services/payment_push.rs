use crate::error::Result;
use crate::models::{NormalizedPayment, PaymentResponse, Provider};
use crate::services::gateway::{OutboundPayment, TransportGateway};
use crate::services::status_recorder::StatusRecorder;
use crate::services::token_service::TokenService;
use serde::de::DeserializeOwned;
use tracing::{error, info};

/// Everything a provider needs to push a list of payments.
pub(crate) struct PushContext<'a> {
    pub provider: Provider,
    pub tokens: &'a TokenService,
    pub gateway: &'a TransportGateway,
    pub recorder: &'a StatusRecorder,
    pub payment_url: &'a str,
}

/// Maps, pushes and records one `create_payments` call.
///
/// Every payment is mapped before any request goes out. An HTTP or decode
/// failure during the push is recorded as a failed status for the first
/// payment instead of being returned; a successful push records the first
/// response. Either way
/// the caller gets an empty list and reads outcomes from the status records.
pub(crate) async fn push_and_record<P, R, F>(
    ctx: PushContext<'_>,
    payments: &[NormalizedPayment],
    mapper: F,
) -> Result<Vec<PaymentResponse>>
where
    P: OutboundPayment,
    R: DeserializeOwned + Into<PaymentResponse>,
    F: Fn(&NormalizedPayment) -> Result<P>,
{
    let Some(first) = payments.first() else {
        info!("No payments included for {}. Skipping.", ctx.provider);
        return Ok(Vec::new());
    };

    info!("Constructing and validating {} {} payments", payments.len(), ctx.provider);
    let mapped = payments.iter().map(mapper).collect::<Result<Vec<P>>>()?;

    let token = ctx.tokens.get_token().await?;

    match ctx
        .gateway
        .push_sequential::<P, R>(&token, ctx.payment_url, mapped)
        .await
    {
        Ok(responses) => {
            if let Some(response) = responses.into_iter().next() {
                ctx.recorder.record_success(first, &response.into()).await?;
            }
            Ok(Vec::new())
        }
        Err(e) if e.is_recorded_push_failure() => {
            error!("{} payment push failed: {}", ctx.provider, e);
            ctx.recorder.record_failure(first).await?;
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}
