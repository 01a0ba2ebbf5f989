//! CSV ingestion for reference-data extracts
//!
//! Loads the member, enrollment, plan, pharmacy, drug, and formulary extracts
//! into PostgreSQL, and reads the claim feed the simulator replays. Records
//! deserialize through serde; a malformed row aborts the load rather than
//! silently skipping data.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use core_kernel::{Money, Ndc};
use domain_adjudication::ClaimRequest;
use domain_benefit::{
    BenefitPlan, Drug, Enrollment, FormularyStatus, Gender, Member, NetworkAssignment, Pharmacy,
    PharmacyType, PlanType, Tier,
};

use crate::error::DatabaseError;
use crate::repositories::formulary::FormularyRecord;
use crate::repositories::{
    DrugRepository, EnrollmentRepository, FormularyRepository, MemberRepository,
    PharmacyRepository, PlanRepository,
};
use crate::DatabasePool;

/// Errors during CSV ingestion
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Bad record: {0}")]
    BadRecord(String),
}

fn read_records<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>, IngestError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }
    Ok(records)
}

#[derive(Debug, Deserialize)]
struct MemberRecord {
    member_number: String,
    first_name: String,
    last_name: String,
    date_of_birth: NaiveDate,
    gender: String,
}

/// Loads the member extract
pub async fn load_members(pool: &DatabasePool, path: &Path) -> Result<u64, IngestError> {
    let members: Vec<Member> = read_records::<MemberRecord>(path)?
        .into_iter()
        .map(|r| Member {
            member_number: r.member_number,
            first_name: r.first_name,
            last_name: r.last_name,
            date_of_birth: r.date_of_birth,
            gender: match r.gender.as_str() {
                "M" => Gender::M,
                "F" => Gender::F,
                _ => Gender::U,
            },
        })
        .collect();

    let inserted = MemberRepository::new(pool.clone())
        .insert_batch(&members)
        .await?;
    info!(rows = inserted, file = %path.display(), "loaded members");
    Ok(inserted)
}

#[derive(Debug, Deserialize)]
struct EnrollmentRecord {
    member_number: String,
    plan_code: String,
    group_number: Option<String>,
    effective_date: NaiveDate,
    termination_date: Option<NaiveDate>,
    relationship: Option<String>,
    is_active: bool,
}

/// Loads the enrollment extract
pub async fn load_enrollments(pool: &DatabasePool, path: &Path) -> Result<u64, IngestError> {
    let enrollments: Vec<Enrollment> = read_records::<EnrollmentRecord>(path)?
        .into_iter()
        .map(|r| Enrollment {
            member_number: r.member_number,
            plan_code: r.plan_code,
            group_number: r.group_number,
            effective_date: r.effective_date,
            termination_date: r.termination_date,
            relationship: r.relationship,
            is_active: r.is_active,
        })
        .collect();

    let inserted = EnrollmentRepository::new(pool.clone())
        .insert_batch(&enrollments)
        .await?;
    info!(rows = inserted, file = %path.display(), "loaded enrollments");
    Ok(inserted)
}

#[derive(Debug, Deserialize)]
struct PlanRecord {
    plan_code: String,
    plan_name: String,
    plan_type: String,
    formulary_code: String,
}

/// Loads the benefit-plan extract
pub async fn load_plans(pool: &DatabasePool, path: &Path) -> Result<u64, IngestError> {
    let plans = read_records::<PlanRecord>(path)?
        .into_iter()
        .map(|r| {
            let plan_type = match r.plan_type.as_str() {
                "COMMERCIAL" => PlanType::Commercial,
                "MEDICARE_PART_D" => PlanType::MedicarePartD,
                "MEDICAID" => PlanType::Medicaid,
                "EXCHANGE" => PlanType::Exchange,
                other => {
                    return Err(IngestError::BadRecord(format!(
                        "unknown plan type {other:?} for plan {}",
                        r.plan_code
                    )))
                }
            };
            Ok(BenefitPlan {
                plan_code: r.plan_code,
                plan_name: r.plan_name,
                plan_type,
                formulary_code: r.formulary_code,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let inserted = PlanRepository::new(pool.clone()).insert_batch(&plans).await?;
    info!(rows = inserted, file = %path.display(), "loaded plans");
    Ok(inserted)
}

#[derive(Debug, Deserialize)]
struct PharmacyRecord {
    ncpdp_id: String,
    pharmacy_name: String,
    npi: Option<String>,
    pharmacy_type: String,
    is_active: bool,
}

/// Loads the pharmacy extract
pub async fn load_pharmacies(pool: &DatabasePool, path: &Path) -> Result<u64, IngestError> {
    let pharmacies = read_records::<PharmacyRecord>(path)?
        .into_iter()
        .map(|r| {
            let pharmacy_type = match r.pharmacy_type.as_str() {
                "RETAIL" => PharmacyType::Retail,
                "MAIL_ORDER" => PharmacyType::MailOrder,
                "SPECIALTY" => PharmacyType::Specialty,
                "LONG_TERM_CARE" => PharmacyType::LongTermCare,
                other => {
                    return Err(IngestError::BadRecord(format!(
                        "unknown pharmacy type {other:?} for {}",
                        r.ncpdp_id
                    )))
                }
            };
            Ok(Pharmacy {
                ncpdp_id: r.ncpdp_id,
                pharmacy_name: r.pharmacy_name,
                npi: r.npi,
                pharmacy_type,
                is_active: r.is_active,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let inserted = PharmacyRepository::new(pool.clone())
        .insert_batch(&pharmacies)
        .await?;
    info!(rows = inserted, file = %path.display(), "loaded pharmacies");
    Ok(inserted)
}

#[derive(Debug, Deserialize)]
struct NetworkRecord {
    ncpdp_id: String,
    plan_code: String,
    effective_date: NaiveDate,
    termination_date: Option<NaiveDate>,
    is_preferred: bool,
}

/// Loads the pharmacy-network extract
pub async fn load_networks(pool: &DatabasePool, path: &Path) -> Result<u64, IngestError> {
    let assignments: Vec<NetworkAssignment> = read_records::<NetworkRecord>(path)?
        .into_iter()
        .map(|r| NetworkAssignment {
            ncpdp_id: r.ncpdp_id,
            plan_code: r.plan_code,
            effective_date: r.effective_date,
            termination_date: r.termination_date,
            is_preferred: r.is_preferred,
        })
        .collect();

    let inserted = PharmacyRepository::new(pool.clone())
        .insert_network_batch(&assignments)
        .await?;
    info!(rows = inserted, file = %path.display(), "loaded pharmacy networks");
    Ok(inserted)
}

#[derive(Debug, Deserialize)]
struct DrugRecord {
    ndc: String,
    label_name: String,
    strength: Option<String>,
    is_generic: bool,
}

/// Loads the drug-file extract
pub async fn load_drugs(pool: &DatabasePool, path: &Path) -> Result<u64, IngestError> {
    let drugs = read_records::<DrugRecord>(path)?
        .into_iter()
        .map(|r| {
            let ndc =
                Ndc::new(r.ndc.trim()).map_err(|e| IngestError::BadRecord(e.to_string()))?;
            Ok(Drug {
                ndc,
                label_name: r.label_name,
                strength: r.strength,
                is_generic: r.is_generic,
            })
        })
        .collect::<Result<Vec<_>, IngestError>>()?;

    let inserted = DrugRepository::new(pool.clone()).insert_batch(&drugs).await?;
    info!(rows = inserted, file = %path.display(), "loaded drugs");
    Ok(inserted)
}

#[derive(Debug, Deserialize)]
struct FormularyDrugRecord {
    formulary_code: String,
    ndc: String,
    tier: u8,
    status: String,
    quantity_limit: Option<Decimal>,
}

/// Loads the formulary extract
pub async fn load_formulary(pool: &DatabasePool, path: &Path) -> Result<u64, IngestError> {
    let records = read_records::<FormularyDrugRecord>(path)?
        .into_iter()
        .map(|r| {
            let ndc =
                Ndc::new(r.ndc.trim()).map_err(|e| IngestError::BadRecord(e.to_string()))?;
            let tier = Tier::from_u8(r.tier)
                .ok_or_else(|| IngestError::BadRecord(format!("tier {} out of range", r.tier)))?;
            let status = match r.status.as_str() {
                "PREFERRED" => FormularyStatus::Preferred,
                "NON_PREFERRED" => FormularyStatus::NonPreferred,
                "SPECIALTY" => FormularyStatus::Specialty,
                other => {
                    return Err(IngestError::BadRecord(format!(
                        "unknown formulary status {other:?}"
                    )))
                }
            };
            Ok(FormularyRecord {
                formulary_code: r.formulary_code,
                entry: domain_benefit::FormularyEntry {
                    ndc,
                    tier,
                    status,
                    quantity_limit: r.quantity_limit,
                },
            })
        })
        .collect::<Result<Vec<_>, IngestError>>()?;

    let inserted = FormularyRepository::new(pool.clone())
        .insert_batch(&records)
        .await?;
    info!(rows = inserted, file = %path.display(), "loaded formulary");
    Ok(inserted)
}

#[derive(Debug, Deserialize)]
struct ClaimFeedRecord {
    member_id: String,
    pharmacy_id: String,
    ndc: String,
    quantity_dispensed: Decimal,
    days_supply: i32,
    refill_number: i32,
    date_of_service: NaiveDate,
    ingredient_cost: Decimal,
    dispensing_fee: Decimal,
}

/// Reads the claim feed the simulator replays; no database involved
pub fn read_claim_feed(path: &Path) -> Result<Vec<ClaimRequest>, IngestError> {
    let requests: Vec<ClaimRequest> = read_records::<ClaimFeedRecord>(path)?
        .into_iter()
        .map(|r| ClaimRequest {
            member_id: r.member_id,
            pharmacy_id: r.pharmacy_id,
            ndc: r.ndc,
            quantity_dispensed: r.quantity_dispensed,
            days_supply: r.days_supply,
            refill_number: r.refill_number,
            date_of_service: r.date_of_service,
            ingredient_cost: Money::new(r.ingredient_cost),
            dispensing_fee: Money::new(r.dispensing_fee),
        })
        .collect();

    info!(rows = requests.len(), file = %path.display(), "read claim feed");
    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_claim_feed() {
        let mut file = tempfile_in_target();
        writeln!(
            file.1,
            "member_id,pharmacy_id,ndc,quantity_dispensed,days_supply,refill_number,date_of_service,ingredient_cost,dispensing_fee"
        )
        .unwrap();
        writeln!(
            file.1,
            "M10001,1234567,12345678901,30,30,0,2025-06-15,100.00,2.50"
        )
        .unwrap();
        file.1.flush().unwrap();

        let requests = read_claim_feed(&file.0).unwrap();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.member_id, "M10001");
        assert_eq!(request.ndc, "12345678901");
        assert_eq!(request.days_supply, 30);
        assert!(request.validate());

        std::fs::remove_file(&file.0).ok();
    }

    fn tempfile_in_target() -> (std::path::PathBuf, std::fs::File) {
        let path = std::env::temp_dir().join(format!(
            "claim_feed_test_{}.csv",
            std::process::id()
        ));
        let file = std::fs::File::create(&path).unwrap();
        (path, file)
    }
}
