// SQLite JobRepository Implementation

use crate::error::map_sqlx_error;
use crate::sql_filter::{push_filter, push_order_by};
use async_trait::async_trait;
use jobmatch_core::domain::{FilterExpression, Job, JobId, JobLevel, PageRequest, PageResult};
use jobmatch_core::port::{ExecutionFailure, JobRepository};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

const JOB_COLUMNS: &str = "id, name, description, location, salary, quantity, level, active, \
                           cluster, created_at, updated_at";

pub struct SqliteJobRepository {
    pool: SqlitePool,
}

impl SqliteJobRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

async fn insert_skills(
    conn: &mut SqliteConnection,
    job_id: JobId,
    skills: &BTreeSet<String>,
) -> Result<(), ExecutionFailure> {
    if skills.is_empty() {
        return Ok(());
    }
    let mut qb = QueryBuilder::<Sqlite>::new("INSERT INTO job_skills (job_id, skill) ");
    qb.push_values(skills, |mut row, skill| {
        row.push_bind(job_id).push_bind(skill.clone());
    });
    qb.build()
        .execute(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;
    Ok(())
}

/// Fill in `skills` for already-loaded rows
async fn load_skills(conn: &mut SqliteConnection, jobs: &mut [Job]) -> Result<(), ExecutionFailure> {
    if jobs.is_empty() {
        return Ok(());
    }
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT job_id, skill FROM job_skills WHERE job_id IN (");
    let mut ids = qb.separated(", ");
    for job in jobs.iter() {
        ids.push_bind(job.id);
    }
    ids.push_unseparated(")");

    let rows: Vec<(JobId, String)> = qb
        .build_query_as()
        .fetch_all(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;

    let mut by_job: HashMap<JobId, BTreeSet<String>> = HashMap::new();
    for (job_id, skill) in rows {
        by_job.entry(job_id).or_default().insert(skill);
    }
    for job in jobs.iter_mut() {
        job.skills = by_job.remove(&job.id).unwrap_or_default();
    }
    Ok(())
}

#[async_trait]
impl JobRepository for SqliteJobRepository {
    async fn insert(&self, job: &Job) -> Result<JobId, ExecutionFailure> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let result = sqlx::query(
            r#"
            INSERT INTO jobs (
                name, description, location, salary, quantity,
                level, active, cluster, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&job.name)
        .bind(&job.description)
        .bind(&job.location)
        .bind(job.salary)
        .bind(job.quantity)
        .bind(job.level.as_str())
        .bind(job.active)
        .bind(job.cluster)
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        let id = result.last_insert_rowid();
        insert_skills(&mut tx, id, &job.skills).await?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(id)
    }

    async fn find_by_id(&self, id: JobId) -> Result<Option<Job>, ExecutionFailure> {
        let mut conn = self.pool.acquire().await.map_err(map_sqlx_error)?;

        let row = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {} FROM jobs WHERE id = ?",
            JOB_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut jobs = [row.into_job()?];
        load_skills(&mut conn, &mut jobs).await?;
        let [job] = jobs;
        Ok(Some(job))
    }

    async fn update(&self, job: &Job) -> Result<bool, ExecutionFailure> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        // cluster and created_at are not touched
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET name = ?, description = ?, location = ?, salary = ?, quantity = ?,
                level = ?, active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&job.name)
        .bind(&job.description)
        .bind(&job.location)
        .bind(job.salary)
        .bind(job.quantity)
        .bind(job.level.as_str())
        .bind(job.active)
        .bind(job.updated_at)
        .bind(job.id)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("DELETE FROM job_skills WHERE job_id = ?")
            .bind(job.id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        insert_skills(&mut tx, job.id, &job.skills).await?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(true)
    }

    async fn delete(&self, id: JobId) -> Result<bool, ExecutionFailure> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query("DELETE FROM job_skills WHERE job_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let result = sqlx::query("DELETE FROM jobs WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn execute(
        &self,
        filter: &FilterExpression,
        page: &PageRequest,
    ) -> Result<PageResult<Job>, ExecutionFailure> {
        // Count and slice in one transaction so they see the same snapshot
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM jobs WHERE ");
        push_filter(&mut count, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        // An offset past i64::MAX is past any row SQLite can hold
        let offset = i64::try_from(page.offset()).ok().filter(|_| total > 0);

        let mut jobs = Vec::new();
        if let Some(offset) = offset {
            let mut select =
                QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM jobs WHERE ", JOB_COLUMNS));
            push_filter(&mut select, filter);
            push_order_by(&mut select, page.sort());
            select
                .push(" LIMIT ")
                .push_bind(i64::from(page.size()))
                .push(" OFFSET ")
                .push_bind(offset);

            let rows: Vec<JobRow> = select
                .build_query_as()
                .fetch_all(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;

            jobs = rows
                .into_iter()
                .map(JobRow::into_job)
                .collect::<Result<Vec<_>, _>>()?;
            load_skills(&mut tx, &mut jobs).await?;
        }

        tx.commit().await.map_err(map_sqlx_error)?;

        debug!(
            total,
            returned = jobs.len(),
            page = page.index(),
            "Executed job query"
        );
        Ok(PageResult::new(jobs, total as u64, page))
    }
}

/// SQLite row representation (skills live in job_skills)
#[derive(Debug, sqlx::FromRow)]
struct JobRow {
    id: i64,
    name: String,
    description: String,
    location: String,
    salary: f64,
    quantity: i64,
    level: String,
    active: bool,
    cluster: Option<i64>,
    created_at: i64,
    updated_at: Option<i64>,
}

impl JobRow {
    fn into_job(self) -> Result<Job, ExecutionFailure> {
        let level: JobLevel = self.level.parse().map_err(|_| ExecutionFailure::CorruptRow {
            id: self.id,
            reason: format!("unknown level '{}'", self.level),
        })?;

        let cluster = self
            .cluster
            .map(i32::try_from)
            .transpose()
            .map_err(|_| ExecutionFailure::CorruptRow {
                id: self.id,
                reason: format!("cluster {:?} out of range", self.cluster),
            })?;

        Ok(Job {
            id: self.id,
            name: self.name,
            description: self.description,
            location: self.location,
            salary: self.salary,
            quantity: self.quantity,
            level,
            active: self.active,
            skills: BTreeSet::new(),
            cluster,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};
    use jobmatch_core::domain::filter::MAX_PREDICATES;
    use jobmatch_core::domain::{JobDraft, Sort};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    async fn setup_test_db() -> (SqlitePool, SqliteJobRepository) {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        (pool.clone(), SqliteJobRepository::new(pool))
    }

    async fn set_cluster(pool: &SqlitePool, id: JobId, cluster: Option<i64>) {
        sqlx::query("UPDATE jobs SET cluster = ? WHERE id = ?")
            .bind(cluster)
            .bind(id)
            .execute(pool)
            .await
            .unwrap();
    }

    fn job(name: &str, salary: f64, level: JobLevel, skills: &[&str]) -> Job {
        Job::new(
            JobDraft {
                name: name.to_string(),
                description: String::new(),
                location: "Ho Chi Minh".to_string(),
                salary,
                quantity: 1,
                level,
                active: true,
                skills: skills.iter().map(|s| s.to_string()).collect(),
            },
            1000,
        )
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let (_, repo) = setup_test_db().await;

        let new = job("Rust Engineer", 3000.0, JobLevel::Senior, &["Rust", "SQL"]);
        let id = repo.insert(&new).await.unwrap();

        let found = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.name, "Rust Engineer");
        assert_eq!(found.level, JobLevel::Senior);
        assert_eq!(found.skills, new.skills);
        assert_eq!(found.cluster, None);

        assert!(repo.find_by_id(id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_keeps_cluster_and_replaces_skills() {
        let (pool, repo) = setup_test_db().await;
        let id = repo
            .insert(&job("Go Dev", 1000.0, JobLevel::Junior, &["go"]))
            .await
            .unwrap();
        set_cluster(&pool, id, Some(3)).await;

        let mut changed = job("Go Developer", 1500.0, JobLevel::Middle, &["go", "k8s"]);
        changed.id = id;
        changed.cluster = None;
        changed.updated_at = Some(2000);
        assert!(repo.update(&changed).await.unwrap());

        let found = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.name, "Go Developer");
        assert_eq!(found.cluster, Some(3));
        assert_eq!(found.updated_at, Some(2000));
        assert_eq!(found.skills.len(), 2);

        changed.id = id + 100;
        assert!(!repo.update(&changed).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete() {
        let (pool, repo) = setup_test_db().await;
        let id = repo
            .insert(&job("A", 1.0, JobLevel::Intern, &["x"]))
            .await
            .unwrap();

        assert!(repo.delete(id).await.unwrap());
        assert!(!repo.delete(id).await.unwrap());

        let skills: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM job_skills")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(skills, 0);
    }

    #[tokio::test]
    async fn test_execute_pages_with_stable_order() {
        let (_, repo) = setup_test_db().await;
        for i in 0..23 {
            repo.insert(&job(&format!("job-{}", i), 100.0, JobLevel::Junior, &[]))
                .await
                .unwrap();
        }

        let mut seen = Vec::new();
        for index in 0..3 {
            let page = PageRequest::new(index, 10).unwrap();
            let result = repo.execute(&FilterExpression::All, &page).await.unwrap();
            assert_eq!(result.total_count, 23);
            assert_eq!(result.total_pages, 3);
            seen.extend(result.items.iter().map(|j| j.id));
        }
        assert_eq!(seen, (1..=23).collect::<Vec<_>>());

        let past_end = PageRequest::new(9, 10).unwrap();
        let result = repo.execute(&FilterExpression::All, &past_end).await.unwrap();
        assert!(result.items.is_empty());
        assert_eq!(result.total_count, 23);
    }

    #[tokio::test]
    async fn test_execute_like_treats_wildcards_literally() {
        let (_, repo) = setup_test_db().await;
        repo.insert(&job("50% remote", 1.0, JobLevel::Junior, &[]))
            .await
            .unwrap();
        repo.insert(&job("500 remote", 1.0, JobLevel::Junior, &[]))
            .await
            .unwrap();

        let filter = FilterExpression::parse("name ~ '50%'").unwrap();
        let page = PageRequest::new(0, 10).unwrap();
        let result = repo.execute(&filter, &page).await.unwrap();
        assert_eq!(result.total_count, 1);
        assert_eq!(result.items[0].name, "50% remote");
    }

    #[tokio::test]
    async fn test_execute_sort_by_level_desc() {
        let (_, repo) = setup_test_db().await;
        for level in [JobLevel::Junior, JobLevel::Senior, JobLevel::Intern, JobLevel::Senior] {
            repo.insert(&job("x", 1.0, level, &[])).await.unwrap();
        }

        let page = PageRequest::new(0, 10)
            .unwrap()
            .with_sort(Some(Sort::parse("level,desc").unwrap()));
        let result = repo.execute(&FilterExpression::All, &page).await.unwrap();
        let order: Vec<_> = result.items.iter().map(|j| (j.level, j.id)).collect();
        assert_eq!(
            order,
            vec![
                (JobLevel::Senior, 2),
                (JobLevel::Senior, 4),
                (JobLevel::Junior, 1),
                (JobLevel::Intern, 3)
            ]
        );
    }

    /// SQL translation and FilterExpression::matches must select the same rows
    #[tokio::test]
    async fn test_sql_agrees_with_in_memory_semantics() {
        let (pool, repo) = setup_test_db().await;
        let mut rng = StdRng::seed_from_u64(42);
        let names = ["Rust Engineer", "go developer", "Data_Analyst", "QA 100%"];
        let skill_pool = ["rust", "go", "sql", "python"];

        for i in 0..40 {
            let skills: Vec<&str> = skill_pool
                .iter()
                .copied()
                .filter(|_| rng.gen_bool(0.4))
                .collect();
            let level = JobLevel::ALL[rng.gen_range(0..JobLevel::ALL.len())];
            let mut j = job(names[i % names.len()], rng.gen_range(0..10) as f64 * 500.0, level, &skills);
            j.active = rng.gen_bool(0.5);
            let id = repo.insert(&j).await.unwrap();
            let cluster = if rng.gen_bool(0.25) {
                None
            } else {
                Some(rng.gen_range(0..3))
            };
            set_cluster(&pool, id, cluster).await;
        }

        let everything = PageRequest::new(0, 100).unwrap();
        let all_jobs = repo.execute(&FilterExpression::All, &everything).await.unwrap().items;

        for q in [
            "salary > 2000",
            "salary <: 1500.5 or active : false",
            "cluster : null",
            "cluster ! null and cluster ! 1",
            "cluster < 2",
            "name ~ 'ENGINEER'",
            "name ~ '_'",
            "name ~ '100%' or skills : rust",
            "skills ! go and (level : senior or level : intern)",
            "title : 'go developer'",
            "id >: 10 and id < 20 and active : true",
        ] {
            let filter = FilterExpression::parse(q).unwrap();
            let expected: Vec<JobId> = all_jobs
                .iter()
                .filter(|j| filter.matches(j))
                .map(|j| j.id)
                .collect();

            let result = repo.execute(&filter, &everything).await.unwrap();
            let actual: Vec<JobId> = result.items.iter().map(|j| j.id).collect();

            assert_eq!(actual, expected, "filter '{}'", q);
            assert_eq!(result.total_count as usize, expected.len());
        }
    }

    #[tokio::test]
    async fn test_page_offset_beyond_i64_is_empty() {
        let (_, repo) = setup_test_db().await;
        repo.insert(&job("Only", 100.0, JobLevel::Junior, &[])).await.unwrap();

        let far = PageRequest::new(u32::MAX, u32::MAX).unwrap();
        assert!(far.offset() > i64::MAX as u64);

        let result = repo.execute(&FilterExpression::All, &far).await.unwrap();
        assert!(result.items.is_empty());
        assert_eq!(result.total_count, 1);
        assert_eq!(result.page_index, u32::MAX);
    }

    /// The largest filter the parser accepts must still be executable,
    /// alone and with the cluster predicate appended
    #[tokio::test]
    async fn test_largest_accepted_filter_executes() {
        let (pool, repo) = setup_test_db().await;
        let id = repo
            .insert(&job("Wide", 100.0, JobLevel::Junior, &["rust"]))
            .await
            .unwrap();
        set_cluster(&pool, id, Some(1)).await;

        let mut terms: Vec<String> = (1..MAX_PREDICATES as i64)
            .map(|i| format!("id : {}", id + i))
            .collect();
        terms.push(format!("id : {}", id));
        assert_eq!(terms.len(), MAX_PREDICATES);
        let query = terms.join(" or ");
        let filter = FilterExpression::parse(&query).unwrap();
        let page = PageRequest::new(0, 10).unwrap();

        let plain = repo.execute(&filter, &page).await.unwrap();
        assert_eq!(plain.total_count, 1);

        let scoped = FilterExpression::combine_and(&filter, &FilterExpression::cluster_eq(1));
        let result = repo.execute(&scoped, &page).await.unwrap();
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].id, id);

        let other = FilterExpression::combine_and(&filter, &FilterExpression::cluster_eq(2));
        assert_eq!(repo.execute(&other, &page).await.unwrap().total_count, 0);
    }
}
