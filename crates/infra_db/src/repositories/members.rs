//! Member repository

use chrono::NaiveDate;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use domain_benefit::{Gender, Member};

use crate::error::DatabaseError;

/// Database access for the member file
#[derive(Debug, Clone)]
pub struct MemberRepository {
    pool: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
    member_number: String,
    first_name: String,
    last_name: String,
    date_of_birth: NaiveDate,
    gender: String,
}

impl MemberRow {
    fn into_member(self) -> Member {
        Member {
            member_number: self.member_number,
            first_name: self.first_name,
            last_name: self.last_name,
            date_of_birth: self.date_of_birth,
            gender: parse_gender(&self.gender),
        }
    }
}

fn parse_gender(code: &str) -> Gender {
    match code {
        "M" => Gender::M,
        "F" => Gender::F,
        _ => Gender::U,
    }
}

fn gender_code(gender: Gender) -> &'static str {
    match gender {
        Gender::M => "M",
        Gender::F => "F",
        Gender::U => "U",
    }
}

impl MemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Looks up a member by member number
    pub async fn find_by_member_number(
        &self,
        member_number: &str,
    ) -> Result<Option<Member>, DatabaseError> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT member_number, first_name, last_name, date_of_birth, gender
            FROM members
            WHERE member_number = $1
            "#,
        )
        .bind(member_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(MemberRow::into_member))
    }

    /// Batch-inserts members, skipping duplicates on member number
    pub async fn insert_batch(&self, members: &[Member]) -> Result<u64, DatabaseError> {
        if members.is_empty() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::new(
            "INSERT INTO members (member_id, member_number, first_name, last_name, date_of_birth, gender) ",
        );
        builder.push_values(members, |mut b, member| {
            b.push_bind(Uuid::new_v4())
                .push_bind(&member.member_number)
                .push_bind(&member.first_name)
                .push_bind(&member.last_name)
                .push_bind(member.date_of_birth)
                .push_bind(gender_code(member.gender));
        });
        builder.push(" ON CONFLICT (member_number) DO NOTHING");

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
