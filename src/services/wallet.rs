//! Coin wallet, pricing and billing.

use tracing::info;

use crate::api::ApiClient;
use crate::envelope;
use crate::http::{ApiError, ApiResult};
use crate::models::{
    BillingAddress, BuyCoinsRequest, CoinBalance, MpesaRequest, PaymentReceipt, PricingPlan,
    Transaction,
};
use crate::token_store::TokenStore;

#[derive(Clone)]
pub struct WalletService {
    api: ApiClient,
    tokens: TokenStore,
}

impl WalletService {
    pub fn new(api: ApiClient, tokens: TokenStore) -> Self {
        Self { api, tokens }
    }

    /// Current balance; a successful read refreshes the cached copy
    pub async fn balance(&self) -> ApiResult<CoinBalance> {
        let response: ApiResult<CoinBalance> = envelope::unwrap(self.api.get("/wallet/balance").await);
        if let Ok(ok) = &response {
            self.tokens.cache_balance(ok.data.balance);
        }
        response
    }

    /// Last balance seen, without a network call
    pub fn cached_balance(&self) -> Option<u64> {
        self.tokens.cached_balance()
    }

    pub async fn pricing_plans(&self) -> ApiResult<Vec<PricingPlan>> {
        envelope::unwrap::<Option<Vec<PricingPlan>>>(self.api.get("/pricing/plans").await)
            .map(|r| r.map(Option::unwrap_or_default))
    }

    pub async fn transactions(&self) -> ApiResult<Vec<Transaction>> {
        envelope::unwrap::<Option<Vec<Transaction>>>(self.api.get("/wallet/transactions").await)
            .map(|r| r.map(Option::unwrap_or_default))
    }

    /// Card purchase. Each attempt carries its own idempotency key.
    pub async fn buy_coins(&self, plan_id: i64, payment_method_id: &str) -> ApiResult<PaymentReceipt> {
        check_plan(plan_id)?;
        if payment_method_id.trim().is_empty() {
            return Err(ApiError::Validation("Payment method is required".into()));
        }
        let request = BuyCoinsRequest {
            plan_id,
            payment_method_id: payment_method_id.to_string(),
        };
        let receipt = self.record_receipt(envelope::unwrap(
            self.api.post_idempotent("/wallet/buy-coins", &request).await,
        ));
        if receipt.is_ok() {
            info!("Coin purchase submitted for plan {}", plan_id);
        }
        receipt
    }

    /// M-Pesa STK push for a plan
    pub async fn mpesa_payment(&self, plan_id: i64, phone_number: &str) -> ApiResult<PaymentReceipt> {
        check_plan(plan_id)?;
        let phone: String = phone_number.chars().filter(|c| !c.is_whitespace()).collect();
        let digits = phone.trim_start_matches('+');
        if digits.len() < 9 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ApiError::Validation("Enter a valid phone number".into()));
        }
        let request = MpesaRequest {
            plan_id,
            phone_number: phone,
        };
        self.record_receipt(envelope::unwrap(
            self.api.post_idempotent("/wallet/mpesa", &request).await,
        ))
    }

    pub async fn billing_address(&self) -> ApiResult<Option<BillingAddress>> {
        envelope::unwrap(self.api.get("/wallet/billing-address").await)
    }

    pub async fn update_billing_address(&self, address: &BillingAddress) -> ApiResult<BillingAddress> {
        if address.line1.trim().is_empty() || address.city.trim().is_empty() {
            return Err(ApiError::Validation("Address line and city are required".into()));
        }
        envelope::unwrap(self.api.put("/wallet/billing-address", address).await)
    }

    fn record_receipt(&self, receipt: ApiResult<PaymentReceipt>) -> ApiResult<PaymentReceipt> {
        if let Ok(ok) = &receipt {
            if let Some(balance) = ok.data.new_balance {
                self.tokens.cache_balance(balance);
            }
        }
        receipt
    }
}

fn check_plan(plan_id: i64) -> Result<(), ApiError> {
    if plan_id <= 0 {
        return Err(ApiError::Validation("Select a coin plan".into()));
    }
    Ok(())
}
