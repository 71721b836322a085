//! Event query builder for `tx_search`.
//!
//! Produces Tendermint query strings such as
//! `message.sender='iaa1...' AND tx.height>=100`.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Text(String),
    Number(i64),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Text(s) => write!(f, "'{}'", s.replace('\'', "\\'")),
            QueryValue::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Text(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Number(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        QueryValue::Number(value.into())
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        QueryValue::Number(value.into())
    }
}

impl From<u64> for QueryValue {
    fn from(value: u64) -> Self {
        QueryValue::Number(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
    Contains,
}

impl Operator {
    fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Contains => " CONTAINS ",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare {
        key: String,
        op: Operator,
        value: QueryValue,
    },
    Exists {
        key: String,
    },
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Compare { key, op, value } => write!(f, "{}{}{}", key, op.as_str(), value),
            Condition::Exists { key } => write!(f, "{key} EXISTS"),
        }
    }
}

/// Accumulates `AND`-joined conditions.
///
/// ```
/// use irita_rpc::rpc::EventQueryBuilder;
///
/// let query = EventQueryBuilder::new()
///     .eq("message.module", "nft")
///     .gte("tx.height", 100)
///     .build();
/// assert_eq!(query, "message.module='nft' AND tx.height>=100");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventQueryBuilder {
    conditions: Vec<Condition>,
}

impl EventQueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    fn compare(self, key: impl Into<String>, op: Operator, value: impl Into<QueryValue>) -> Self {
        self.condition(Condition::Compare {
            key: key.into(),
            op,
            value: value.into(),
        })
    }

    pub fn eq(self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.compare(key, Operator::Eq, value)
    }

    pub fn lt(self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.compare(key, Operator::Lt, value)
    }

    pub fn lte(self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.compare(key, Operator::Lte, value)
    }

    pub fn gt(self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.compare(key, Operator::Gt, value)
    }

    pub fn gte(self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.compare(key, Operator::Gte, value)
    }

    pub fn contains(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.compare(key, Operator::Contains, QueryValue::Text(value.into()))
    }

    pub fn exists(self, key: impl Into<String>) -> Self {
        self.condition(Condition::Exists { key: key.into() })
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// The query string; empty when no condition was added.
    pub fn build(&self) -> String {
        self.conditions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_builder_builds_empty_query() {
        let builder = EventQueryBuilder::new();
        assert!(builder.is_empty());
        assert_eq!(builder.build(), "");
    }

    #[test]
    fn test_all_operators() {
        let query = EventQueryBuilder::new()
            .eq("message.sender", "iaa1abc")
            .lt("tx.height", 10)
            .lte("tx.height", 11)
            .gt("tx.height", 1)
            .gte("tx.height", 2)
            .contains("message.action", "send")
            .exists("transfer.recipient")
            .build();

        assert_eq!(
            query,
            "message.sender='iaa1abc' AND tx.height<10 AND tx.height<=11 AND tx.height>1 AND \
             tx.height>=2 AND message.action CONTAINS 'send' AND transfer.recipient EXISTS"
        );
    }

    #[test]
    fn test_quotes_in_values_are_escaped() {
        assert_eq!(EventQueryBuilder::new().eq("memo.text", "it's").build(), r"memo.text='it\'s'");
    }
}
