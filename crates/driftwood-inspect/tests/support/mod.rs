//! Scripted in-memory [`Connection`] for driving the inspector and
//! auditor without a live database.

// Not every test binary uses every helper.
#![allow(dead_code)]

use driftwood_core::driver::{Connection, Row, Value};
use driftwood_core::{async_trait, err, Error, Result};

/// Routes queries to canned results by substring match on the statement,
/// optionally discriminating on the first bound parameter. The first
/// matching route wins; an unmatched query is an error so tests notice
/// unexpected statements.
#[derive(Debug, Default)]
pub struct MockConnection {
    routes: Vec<Route>,
}

#[derive(Debug)]
struct Route {
    pattern: &'static str,
    param: Option<&'static str>,
    result: Result<Vec<Row>>,
}

impl MockConnection {
    pub fn new() -> MockConnection {
        MockConnection::default()
    }

    pub fn on(mut self, pattern: &'static str, rows: Vec<Row>) -> Self {
        self.routes.push(Route {
            pattern,
            param: None,
            result: Ok(rows),
        });
        self
    }

    pub fn on_param(mut self, pattern: &'static str, param: &'static str, rows: Vec<Row>) -> Self {
        self.routes.push(Route {
            pattern,
            param: Some(param),
            result: Ok(rows),
        });
        self
    }

    pub fn fail_on(mut self, pattern: &'static str, error: Error) -> Self {
        self.routes.push(Route {
            pattern,
            param: None,
            result: Err(error),
        });
        self
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        for route in &self.routes {
            if !sql.contains(route.pattern) {
                continue;
            }
            if let Some(param) = route.param {
                let matched = params
                    .first()
                    .is_some_and(|value| matches!(value, Value::String(s) if s == param));
                if !matched {
                    continue;
                }
            }
            return route.result.clone();
        }
        Err(err!("no mock route for query: {sql}"))
    }
}

pub fn row(spec: &[(&str, Value)]) -> Row {
    Row::new(
        spec.iter().map(|(column, _)| column.to_string()).collect(),
        spec.iter().map(|(_, value)| value.clone()).collect(),
    )
}

pub fn s(value: &str) -> Value {
    Value::from(value)
}

pub fn table_name_row(name: &str) -> Row {
    row(&[("table_name", s(name))])
}

pub fn column_row(name: &str, data_type: &str, nullable: bool, default: Option<&str>) -> Row {
    row(&[
        ("column_name", s(name)),
        ("data_type", s(data_type)),
        ("is_nullable", s(if nullable { "YES" } else { "NO" })),
        (
            "column_default",
            default.map(s).unwrap_or(Value::Null),
        ),
    ])
}

pub fn index_row(name: &str, unique: bool, column: &str) -> Row {
    row(&[
        ("index_name", s(name)),
        ("is_unique", Value::Bool(unique)),
        ("column_name", s(column)),
    ])
}

pub fn constraint_row(name: &str, kind: &str, column: &str) -> Row {
    row(&[
        ("constraint_name", s(name)),
        ("constraint_type", s(kind)),
        ("column_name", s(column)),
    ])
}

pub fn count_row(count: i64) -> Row {
    row(&[("count", Value::I64(count))])
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
