//! Closed Day Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::ClosedDay;
use crate::utils::time;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "closed_day";

#[derive(Clone)]
pub struct ClosedDayRepository {
    base: BaseRepository,
}

impl ClosedDayRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List closed days, optionally bounded by from/to (inclusive)
    pub async fn find_all(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> RepoResult<Vec<ClosedDay>> {
        let mut sql = String::from("SELECT * FROM closed_day");
        let mut clauses = Vec::new();
        if from.is_some() {
            clauses.push("date >= $from");
        }
        if to.is_some() {
            clauses.push("date <= $to");
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY date ASC");

        let mut query = self.base.db().query(sql);
        if let Some(from) = from {
            query = query.bind(("from", from.to_string()));
        }
        if let Some(to) = to {
            query = query.bind(("to", to.to_string()));
        }

        let days: Vec<ClosedDay> = query.await?.take(0)?;
        Ok(days)
    }

    /// Find a closed day by date
    pub async fn find_by_date(&self, date: &str) -> RepoResult<Option<ClosedDay>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM closed_day WHERE date = $date LIMIT 1")
            .bind(("date", date.to_string()))
            .await?;
        let days: Vec<ClosedDay> = result.take(0)?;
        Ok(days.into_iter().next())
    }

    /// Mark a day as closed
    pub async fn create(&self, date: &str, note: Option<String>) -> RepoResult<ClosedDay> {
        if self.find_by_date(date).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Day {} already marked closed",
                date
            )));
        }

        let day = ClosedDay {
            id: None,
            date: date.to_string(),
            note,
            created_at: time::now_millis(),
        };

        let created: Option<ClosedDay> = self.base.db().create(TABLE).content(day).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create closed day".to_string()))
    }

    /// Remove a closed-day marker; Ok(false) when the date was not marked
    pub async fn delete_by_date(&self, date: &str) -> RepoResult<bool> {
        if self.find_by_date(date).await?.is_none() {
            return Ok(false);
        }
        self.base
            .db()
            .query("DELETE FROM closed_day WHERE date = $date")
            .bind(("date", date.to_string()))
            .await?;
        Ok(true)
    }
}
