//! Repository integration tests
//!
//! These run against a disposable Postgres container and need a local Docker
//! daemon: `cargo test -p infra_db -- --ignored`.

use rust_decimal_macros::dec;

use domain_adjudication::{Claim, ResponseCode};
use domain_benefit::Tier;
use test_utils::builders::{ClaimRequestBuilder, EnrollmentBuilder, FormularyEntryBuilder};
use test_utils::database::create_isolated_test_database;
use test_utils::fixtures::{synthetic_members, DateFixtures, IdFixtures};

use infra_db::repositories::formulary::FormularyRecord;
use infra_db::repositories::{
    ClaimRepository, EnrollmentRepository, FormularyRepository, MemberRepository,
};

#[tokio::test]
#[ignore = "requires Docker"]
async fn member_round_trip() {
    let db = create_isolated_test_database().await.unwrap();
    let repo = MemberRepository::new(db.pool().clone());

    let members = synthetic_members(25);
    let inserted = repo.insert_batch(&members).await.unwrap();
    assert_eq!(inserted, 25);

    let found = repo
        .find_by_member_number(&members[0].member_number)
        .await
        .unwrap()
        .expect("member was just inserted");
    assert_eq!(found.member_number, members[0].member_number);
    assert_eq!(found.first_name, members[0].first_name);

    assert!(repo.find_by_member_number("NOPE").await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn enrollment_active_on_filters_by_window() {
    let db = create_isolated_test_database().await.unwrap();
    let repo = EnrollmentRepository::new(db.pool().clone());

    let current = EnrollmentBuilder::new().build();
    let expired = EnrollmentBuilder::new()
        .with_plan_code("OLD-PLAN")
        .with_effective_date(DateFixtures::plan_effective() - chrono::Days::new(730))
        .with_termination_date(DateFixtures::plan_effective() - chrono::Days::new(365))
        .build();
    repo.insert_batch(&[current, expired]).await.unwrap();

    let active = repo
        .find_active_on(IdFixtures::member_number(), DateFixtures::date_of_service())
        .await
        .unwrap()
        .expect("current enrollment covers the date of service");
    assert_eq!(active.plan_code, IdFixtures::plan_code());

    let all = repo
        .find_by_member_number(IdFixtures::member_number())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn formulary_lookup_resolves_through_plan() {
    let db = create_isolated_test_database().await.unwrap();
    let repo = FormularyRepository::new(db.pool().clone());

    sqlx::query(
        "INSERT INTO benefit_plans (plan_id, plan_code, plan_name, plan_type, formulary_code)
         VALUES (gen_random_uuid(), $1, 'Gold PPO', 'COMMERCIAL', 'STD-FORM')",
    )
    .bind(IdFixtures::plan_code())
    .execute(db.pool())
    .await
    .unwrap();

    let entry = FormularyEntryBuilder::new().with_tier(Tier::Specialty).build();
    repo.insert_batch(&[FormularyRecord {
        formulary_code: "STD-FORM".to_string(),
        entry,
    }])
    .await
    .unwrap();

    let found = repo
        .find_for_plan(IdFixtures::ndc(), IdFixtures::plan_code())
        .await
        .unwrap()
        .expect("entry on the plan's formulary");
    assert_eq!(found.tier, Tier::Specialty);
    assert!(found.requires_prior_auth());
    assert_eq!(found.quantity_limit, Some(dec!(30)));

    assert!(repo
        .find_for_plan("99999999999", IdFixtures::plan_code())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn claim_batch_insert_and_counts() {
    let db = create_isolated_test_database().await.unwrap();
    let repo = ClaimRepository::new(db.pool().clone());

    let request = ClaimRequestBuilder::new().build();
    let pricing = domain_adjudication::price(
        request.ingredient_cost,
        request.dispensing_fee,
        Tier::Generic,
    );

    let claims: Vec<Claim> = (0..10)
        .map(|i| {
            if i % 2 == 0 {
                Claim::approved(
                    format!("CLM{:015}", i + 1),
                    &request,
                    &pricing,
                    std::time::Duration::from_millis(100),
                )
            } else {
                Claim::rejected(
                    format!("CLM{:015}", i + 1),
                    &request,
                    ResponseCode::PatientNotCovered,
                    ResponseCode::PatientNotCovered.standard_message(),
                    std::time::Duration::from_millis(50),
                )
            }
        })
        .collect();

    let inserted = repo.insert_batch(&claims).await.unwrap();
    assert_eq!(inserted, 10);

    assert_eq!(repo.count().await.unwrap(), 10);
    assert_eq!(repo.count_by_status("APPROVED").await.unwrap(), 5);
    assert_eq!(repo.count_by_status("REJECTED").await.unwrap(), 5);
    assert!(repo.average_processing_time_ms().await.unwrap() > 0.0);
}
