//! Custom assertion helpers for domain types

use domain_adjudication::{ClaimResponse, ClaimStatus, PricingResult, ResponseCode};

/// Asserts the pricing invariants: the split balances to the cent and the
/// patient share never exceeds the total.
pub fn assert_pricing_balances(pricing: &PricingResult) {
    assert_eq!(
        pricing.patient_pay + pricing.plan_pay,
        pricing.total_cost,
        "patient {} + plan {} != total {}",
        pricing.patient_pay,
        pricing.plan_pay,
        pricing.total_cost
    );
    assert!(
        pricing.patient_pay <= pricing.total_cost,
        "patient {} exceeds total {}",
        pricing.patient_pay,
        pricing.total_cost
    );
    assert_eq!(pricing.out_of_pocket_applied, pricing.patient_pay);
}

/// Asserts an approved response with consistent claim stamping
pub fn assert_approved(response: &ClaimResponse) {
    assert!(response.approved, "expected approval, got {:?}", response.claim.response_code);
    assert_eq!(response.claim.status, ClaimStatus::Approved);
    assert_eq!(response.claim.response_code, ResponseCode::Approved);
    let pricing = response
        .pricing
        .as_ref()
        .expect("approved response must carry pricing");
    assert_pricing_balances(pricing);
}

/// Asserts a rejection with the expected code and message
pub fn assert_rejected(response: &ClaimResponse, code: ResponseCode, message: &str) {
    assert!(!response.approved);
    assert_eq!(response.claim.status, ClaimStatus::Rejected);
    assert_eq!(response.claim.response_code, code);
    assert_eq!(response.claim.response_message, message);
    assert!(response.pricing.is_none(), "rejections carry no pricing");
}
