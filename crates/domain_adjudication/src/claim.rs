//! Durable claim record

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::{ClaimId, Money};
use rust_decimal::Decimal;
use serde::Serialize;
use std::time::Duration;

use crate::pricing::PricingResult;
use crate::request::ClaimRequest;
use crate::response::ResponseCode;

/// Terminal outcome of an adjudication call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    Approved,
    Rejected,
}

impl ClaimStatus {
    /// The stored status value
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Approved => "APPROVED",
            ClaimStatus::Rejected => "REJECTED",
        }
    }
}

/// NCPDP billing transaction type for a fill request
const TRANSACTION_TYPE_BILLING: &str = "B1";

/// The durable record of one adjudication
///
/// Created once per call and never mutated after the pipeline returns; a
/// later correction is a new claim or reversal, not an update to this one.
#[derive(Debug, Clone, Serialize)]
pub struct Claim {
    pub id: ClaimId,
    /// Sequential business key, unique across concurrent invocations
    pub claim_number: String,
    pub transaction_type: String,
    pub member_id: String,
    pub pharmacy_id: String,
    pub ndc: String,
    pub quantity_dispensed: Decimal,
    pub days_supply: i32,
    pub refill_number: i32,
    pub date_of_service: NaiveDate,
    pub ingredient_cost_submitted: Money,
    pub dispensing_fee_submitted: Money,
    pub status: ClaimStatus,
    pub response_code: ResponseCode,
    pub response_message: String,
    pub patient_pay: Option<Money>,
    pub plan_pay: Option<Money>,
    pub deductible_applied: Option<Money>,
    pub out_of_pocket_applied: Option<Money>,
    pub processing_time_ms: u64,
    pub processed_at: DateTime<Utc>,
}

impl Claim {
    /// Stamps an approved claim
    pub fn approved(
        claim_number: String,
        request: &ClaimRequest,
        pricing: &PricingResult,
        processing_time: Duration,
    ) -> Self {
        let mut claim = Self::base(claim_number, request, processing_time);
        claim.status = ClaimStatus::Approved;
        claim.response_code = ResponseCode::Approved;
        claim.response_message = ResponseCode::Approved.standard_message().to_string();
        claim.patient_pay = Some(pricing.patient_pay);
        claim.plan_pay = Some(pricing.plan_pay);
        claim.deductible_applied = Some(pricing.deductible_applied);
        claim.out_of_pocket_applied = Some(pricing.out_of_pocket_applied);
        claim
    }

    /// Stamps a rejected claim
    pub fn rejected(
        claim_number: String,
        request: &ClaimRequest,
        code: ResponseCode,
        message: impl Into<String>,
        processing_time: Duration,
    ) -> Self {
        let mut claim = Self::base(claim_number, request, processing_time);
        claim.status = ClaimStatus::Rejected;
        claim.response_code = code;
        claim.response_message = message.into();
        claim
    }

    fn base(claim_number: String, request: &ClaimRequest, processing_time: Duration) -> Self {
        Self {
            id: ClaimId::new_v7(),
            claim_number,
            transaction_type: TRANSACTION_TYPE_BILLING.to_string(),
            member_id: request.member_id.clone(),
            pharmacy_id: request.pharmacy_id.clone(),
            ndc: request.ndc.clone(),
            quantity_dispensed: request.quantity_dispensed,
            days_supply: request.days_supply,
            refill_number: request.refill_number,
            date_of_service: request.date_of_service,
            ingredient_cost_submitted: request.ingredient_cost,
            dispensing_fee_submitted: request.dispensing_fee,
            status: ClaimStatus::Rejected,
            response_code: ResponseCode::HostProcessingError,
            response_message: String::new(),
            patient_pay: None,
            plan_pay: None,
            deductible_applied: None,
            out_of_pocket_applied: None,
            processing_time_ms: processing_time.as_millis() as u64,
            processed_at: Utc::now(),
        }
    }
}
