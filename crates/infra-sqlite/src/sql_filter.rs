// FilterExpression -> SQL translation
//
// Must agree with FilterExpression::matches: NULL compares false, LIKE folds
// ASCII case only, skills are set membership.

use jobmatch_core::domain::filter::{Field, Operator, Predicate, Value};
use jobmatch_core::domain::{FilterExpression, JobLevel, Sort, SortDirection};
use sqlx::{QueryBuilder, Sqlite};

fn column(field: Field) -> &'static str {
    match field {
        Field::Id => "id",
        Field::Name => "name",
        Field::Description => "description",
        Field::Location => "location",
        Field::Salary => "salary",
        Field::Quantity => "quantity",
        Field::Level => "level",
        Field::Active => "active",
        Field::Skills => "skills",
        Field::Cluster => "cluster",
        Field::CreatedAt => "created_at",
        Field::UpdatedAt => "updated_at",
    }
}

fn sql_operator(op: Operator) -> &'static str {
    match op {
        Operator::Eq => "=",
        Operator::Ne => "<>",
        Operator::Gt => ">",
        Operator::Ge => ">=",
        Operator::Lt => "<",
        Operator::Le => "<=",
        Operator::Like => "LIKE",
    }
}

/// `%needle%` with LIKE wildcards escaped
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Seniority order for `level`, which is stored as text
fn level_rank() -> String {
    let mut sql = String::from("CASE level");
    for (rank, level) in JobLevel::ALL.iter().enumerate() {
        sql.push_str(&format!(" WHEN '{}' THEN {}", level.as_str(), rank));
    }
    sql.push_str(" END");
    sql
}

/// Append the SQL condition for `filter`
pub(crate) fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &FilterExpression) {
    match filter {
        FilterExpression::All => {
            qb.push("1 = 1");
        }
        FilterExpression::Predicate(p) => push_predicate(qb, p),
        FilterExpression::And(children) => push_group(qb, children, " AND ", "1 = 1"),
        FilterExpression::Or(children) => push_group(qb, children, " OR ", "1 = 0"),
    }
}

fn push_group(
    qb: &mut QueryBuilder<'_, Sqlite>,
    children: &[FilterExpression],
    separator: &str,
    identity: &str,
) {
    if children.is_empty() {
        qb.push(identity);
        return;
    }
    qb.push("(");
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            qb.push(separator);
        }
        push_filter(qb, child);
    }
    qb.push(")");
}

fn push_predicate(qb: &mut QueryBuilder<'_, Sqlite>, p: &Predicate) {
    let col = column(p.field());

    if p.field() == Field::Skills {
        qb.push(if p.op() == Operator::Ne {
            "NOT EXISTS"
        } else {
            "EXISTS"
        });
        qb.push(" (SELECT 1 FROM job_skills s WHERE s.job_id = jobs.id AND s.skill = ");
        push_value(qb, p.value());
        qb.push(")");
        return;
    }

    match (p.op(), p.value()) {
        (Operator::Eq, Value::Null) => {
            qb.push(col).push(" IS NULL");
        }
        (_, Value::Null) => {
            qb.push(col).push(" IS NOT NULL");
        }
        (Operator::Like, Value::Text(needle)) => {
            qb.push(col)
                .push(" LIKE ")
                .push_bind(like_pattern(needle))
                .push(" ESCAPE '\\'");
        }
        (op, value) => {
            qb.push(col).push(" ").push(sql_operator(op)).push(" ");
            push_value(qb, value);
        }
    }
}

fn push_value(qb: &mut QueryBuilder<'_, Sqlite>, value: &Value) {
    match value {
        Value::Int(i) => qb.push_bind(*i),
        Value::Float(x) => qb.push_bind(*x),
        Value::Text(s) => qb.push_bind(s.clone()),
        Value::Bool(b) => qb.push_bind(*b),
        Value::Level(level) => qb.push_bind(level.as_str()),
        Value::Null => qb.push("NULL"),
    };
}

/// `ORDER BY <sort>, id ASC`
pub(crate) fn push_order_by(qb: &mut QueryBuilder<'_, Sqlite>, sort: Option<&Sort>) {
    qb.push(" ORDER BY ");
    if let Some(sort) = sort {
        match sort.field {
            Field::Level => qb.push(level_rank()),
            field => qb.push(column(field)),
        };
        qb.push(match sort.direction {
            SortDirection::Asc => " ASC, ",
            SortDirection::Desc => " DESC, ",
        });
    }
    qb.push("id ASC");
}
