/*
[INPUT]:  Swap parameters and signed transactions
[OUTPUT]: Unsigned swap transactions and broadcast signatures
[POS]:    HTTP layer - swap endpoints (require x-api-key)
[UPDATE]: When swap request/response format changes
*/

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

use crate::http::endpoint::{Endpoint, Service};
use crate::http::{DritanClient, DritanError, Result};
use crate::types::{SwapBroadcastRequest, SwapBuildRequest, SwapBuildResponse, SwapBroadcastResponse};

impl DritanClient {
    /// Build an unsigned swap transaction
    ///
    /// POST /swap/build
    pub async fn build_swap(&self, request: &SwapBuildRequest) -> Result<SwapBuildResponse> {
        let http_request = self.request(Endpoint::SwapBuild, &[])?.json(request)?;
        self.send_json(Service::Primary, http_request).await
    }

    /// Broadcast a signed transaction (base64)
    ///
    /// POST /swap/broadcast
    pub async fn broadcast_swap(
        &self,
        signed_transaction_base64: &str,
    ) -> Result<SwapBroadcastResponse> {
        let signed_transaction_base64 = signed_transaction_base64.trim();
        if signed_transaction_base64.is_empty() {
            return Err(DritanError::Validation(
                "signed transaction is required".to_string(),
            ));
        }

        let body = SwapBroadcastRequest {
            signed_transaction_base64: signed_transaction_base64.to_string(),
        };
        let http_request = self.request(Endpoint::SwapBroadcast, &[])?.json(&body)?;
        self.send_json(Service::Primary, http_request).await
    }

    /// Broadcast raw signed transaction bytes
    pub async fn broadcast_swap_bytes(&self, signed_transaction: &[u8]) -> Result<SwapBroadcastResponse> {
        self.broadcast_swap(&BASE64.encode(signed_transaction)).await
    }
}
