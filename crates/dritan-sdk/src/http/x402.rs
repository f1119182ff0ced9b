/*
[INPUT]:  Key duration, payer wallet and on-chain payment signature
[OUTPUT]: Pricing, payment quotes and freshly issued API keys
[POS]:    HTTP layer - x402 control plane (unauthenticated)
[UPDATE]: When the key provisioning flow changes
*/

use crate::http::endpoint::{Endpoint, Service};
use crate::http::{DritanClient, DritanError, Result};
use crate::types::{
    LenientPayload, X402ApiKeyCreateRequest, X402ApiKeyCreateResponse, X402ApiKeyQuoteRequest,
    X402ApiKeyQuoteResponse, X402PricingResponse,
};

impl DritanClient {
    /// Current per-minute rate and key limits
    ///
    /// GET /v1/x402/pricing
    pub async fn get_x402_pricing(&self) -> Result<LenientPayload<X402PricingResponse>> {
        let request = self.request(Endpoint::X402Pricing, &[])?;
        self.send_lenient(Service::Control, request).await
    }

    /// Quote the SOL payment for a key of the given duration
    ///
    /// POST /v1/x402/api-keys/quote
    pub async fn create_x402_api_key_quote(
        &self,
        request: &X402ApiKeyQuoteRequest,
    ) -> Result<LenientPayload<X402ApiKeyQuoteResponse>> {
        if request.duration_minutes == 0 {
            return Err(DritanError::Validation(
                "duration_minutes must be positive".to_string(),
            ));
        }
        let http_request = self.request(Endpoint::X402ApiKeyQuote, &[])?.json(request)?;
        self.send_lenient(Service::Control, http_request).await
    }

    /// Redeem a paid quote for an API key
    ///
    /// POST /v1/x402/api-keys
    pub async fn create_x402_api_key(
        &self,
        request: &X402ApiKeyCreateRequest,
    ) -> Result<LenientPayload<X402ApiKeyCreateResponse>> {
        if request.quote_id.trim().is_empty() {
            return Err(DritanError::Validation("quote_id is required".to_string()));
        }
        if request.payment_tx_signature.trim().is_empty() {
            return Err(DritanError::Validation(
                "payment_tx_signature is required".to_string(),
            ));
        }
        let http_request = self.request(Endpoint::X402ApiKeyCreate, &[])?.json(request)?;
        self.send_lenient(Service::Control, http_request).await
    }
}
