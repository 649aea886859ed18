//! SQL generation for the ClickHouse store
//!
//! Compiles an [`EventQuery`] into a `SELECT` over a flat view table whose
//! columns are named by [`Field::column`]. Predicate semantics match
//! [`Predicate::matches`]: a NULL column fails `eq`/`in`/`gt`/`lt` and
//! satisfies `neq`/`nin`. Grouped counts follow
//! [`count_by_period`](crate::aggregate::count_by_period) and
//! [`count_by_dimension`](crate::aggregate::count_by_dimension).

use chrono::{DateTime, Duration, Utc};

use crate::aggregate::{GroupDimension, Period, UNKNOWN_LABEL};
use crate::field::{ALL_FIELDS, Field, FieldValue};
use crate::filter::{EventQuery, Operator, Predicate, Scalar};

/// Builder for a single SELECT statement
pub struct QueryBuilder {
    table: String,
    select: Vec<String>,
    where_clauses: Vec<String>,
    group_by: Vec<String>,
    order_by: Vec<String>,
}

impl QueryBuilder {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            select: Vec::new(),
            where_clauses: Vec::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
        }
    }

    pub fn select(mut self, column: impl Into<String>) -> Self {
        self.select.push(column.into());
        self
    }

    pub fn group_by(mut self, expr: impl Into<String>) -> Self {
        self.group_by.push(expr.into());
        self
    }

    pub fn order_by(mut self, column: impl Into<String>) -> Self {
        self.order_by.push(column.into());
        self
    }

    /// Push down every predicate and the lower bound of a query
    ///
    /// The bound is rounded up to the next microsecond, the finest
    /// precision the literal carries, so no event before it is admitted.
    pub fn apply_query(mut self, query: &EventQuery) -> Self {
        if let Some(bound) = query.lower_bound() {
            self.where_clauses.push(format!(
                "{} >= {}",
                escape_identifier(Field::ViewedAt.column()),
                timestamp_literal(ceil_micros(bound))
            ));
        }
        for predicate in query.predicates() {
            self.where_clauses.push(predicate_to_sql(predicate));
        }
        self
    }

    pub fn build(self) -> String {
        let mut sql = String::from("SELECT ");
        if self.select.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&self.select.join(", "));
        }

        sql.push_str(" FROM ");
        sql.push_str(&escape_identifier(&self.table));

        if !self.where_clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_clauses.join(" AND "));
        }

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }

        sql
    }
}

/// Select every event column matching `query`, ordered by `(viewed_at, id)`
pub fn select_events(table: &str, query: &EventQuery) -> String {
    let builder = ALL_FIELDS
        .iter()
        .fold(QueryBuilder::new(table), |b, f| {
            b.select(escape_identifier(f.column()))
        });

    builder
        .apply_query(query)
        .order_by(Field::ViewedAt.column())
        .order_by(Field::Id.column())
        .build()
}

/// Count events per period, ascending
///
/// Rows carry `period`, `event_count` and `distinct_blogs`.
pub fn count_by_period(table: &str, query: &EventQuery, period: Period) -> String {
    let viewed_at = format!("toTimeZone({}, 'UTC')", Field::ViewedAt.column());
    let start = match period {
        Period::Day => format!("toStartOfDay({})", viewed_at),
        Period::Week => format!("toMonday({})", viewed_at),
        Period::Month => format!("toStartOfMonth({})", viewed_at),
        Period::Year => format!("toStartOfYear({})", viewed_at),
    };

    QueryBuilder::new(table)
        .select(format!("toString({}) AS period", start))
        .select("count() AS event_count")
        .select(format!("uniqExact({}) AS distinct_blogs", Field::BlogId.column()))
        .apply_query(query)
        .group_by("period")
        .order_by("period")
        .build()
}

/// Count events per dimension value, ordered by each group's first event
///
/// Rows carry `label`, `event_count` and `distinct_blogs`.
pub fn count_by_dimension(table: &str, query: &EventQuery, dimension: GroupDimension) -> String {
    let unknown = format!("'{}'", escape_string(UNKNOWN_LABEL));
    let (label, group) = match dimension {
        // A viewer country exists only with a code; a NULL name falls back to it
        GroupDimension::ViewerCountry => {
            let code = Field::ViewerCountryCode.column();
            let name = Field::ViewerCountryName.column();
            let label = format!(
                "multiIf(ifNull({code}, '') = '', {unknown}, {name} IS NULL, {code}, \
                 {name} = '', {unknown}, {name})"
            );
            (label, "label".to_string())
        }
        GroupDimension::ViewerUser => {
            let id = Field::UserId.column();
            let username = Field::UserUsername.column();
            let label = format!(
                "multiIf({id} IS NULL, {unknown}, ifNull({username}, '') = '', {unknown}, \
                 {username})"
            );
            (label, "label".to_string())
        }
        GroupDimension::Blog => {
            let label = format!(
                "argMin({}, ({}, {}))",
                Field::BlogTitle.column(),
                Field::ViewedAt.column(),
                Field::Id.column()
            );
            (label, Field::BlogId.column().to_string())
        }
    };

    QueryBuilder::new(table)
        .select(format!("{} AS label", label))
        .select("count() AS event_count")
        .select(format!("uniqExact({}) AS distinct_blogs", Field::BlogId.column()))
        .apply_query(query)
        .group_by(group)
        .order_by(format!(
            "min(({}, {}))",
            Field::ViewedAt.column(),
            Field::Id.column()
        ))
        .build()
}

/// Convert a predicate to a WHERE clause
///
/// Values that cannot be coerced to the column type compile to constant
/// `0` (never matches) or `1` (always matches) the way evaluation treats them.
pub fn predicate_to_sql(predicate: &Predicate) -> String {
    let field = predicate.field();
    let col = escape_identifier(field.column());
    let literals: Vec<String> = predicate
        .value()
        .as_list()
        .iter()
        .filter_map(|s| literal(field, s))
        .collect();

    match predicate.operator() {
        Operator::Eq | Operator::Gt | Operator::Lt => match literals.first() {
            Some(lit) => format!("{} {} {}", col, comparison(predicate.operator()), lit),
            None => "0".to_string(),
        },
        Operator::Neq => match literals.first() {
            Some(lit) => format!("({} IS NULL OR {} != {})", col, col, lit),
            None => "1".to_string(),
        },
        Operator::In if literals.is_empty() => "0".to_string(),
        Operator::In => format!("{} IN ({})", col, literals.join(", ")),
        Operator::Nin if literals.is_empty() => "1".to_string(),
        Operator::Nin => format!(
            "({} IS NULL OR {} NOT IN ({}))",
            col,
            col,
            literals.join(", ")
        ),
    }
}

fn comparison(op: Operator) -> &'static str {
    match op {
        Operator::Gt => ">",
        Operator::Lt => "<",
        _ => "=",
    }
}

/// Render a scalar as a literal of the field's type
fn literal(field: Field, scalar: &Scalar) -> Option<String> {
    let lit = match scalar.coerce(field.kind())? {
        FieldValue::Int(i) => i.to_string(),
        FieldValue::Text(s) => format!("'{}'", escape_string(&s)),
        FieldValue::Time(t) => timestamp_literal(t),
    };
    Some(lit)
}

fn timestamp_literal(t: DateTime<Utc>) -> String {
    format!(
        "toDateTime64('{}', 6, 'UTC')",
        t.format("%Y-%m-%d %H:%M:%S%.6f")
    )
}

/// Round up to a whole microsecond
fn ceil_micros(t: DateTime<Utc>) -> DateTime<Utc> {
    match t.timestamp_subsec_nanos() % 1_000 {
        0 => t,
        rem => t + Duration::nanoseconds(i64::from(1_000 - rem)),
    }
}

/// Escape a string value for a single-quoted literal
pub fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "''")
}

/// Escape an identifier (column or table name)
pub fn escape_identifier(s: &str) -> String {
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.') {
        s.to_string()
    } else {
        format!("`{}`", s.replace('`', "``"))
    }
}
