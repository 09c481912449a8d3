//! Filter conditions over landing records, compiled to SQL.
//!
//! Conditions are joined with `AND`. User-supplied text is always bound as a
//! parameter; LIKE wildcards inside it are escaped so `%` and `_` match
//! literally.

use sqlx::{Postgres, QueryBuilder};

/// One `WHERE` clause term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// `ano_corte = $n`
    Year(i32),
    /// `ano_corte BETWEEN $n AND $m`
    YearRange(i32, i32),
    /// State name contains the text.
    State(String),
    /// Principal species name contains the text.
    Principal(String),
    /// Principal or scientific/commercial species name contains the text.
    AnySpeciesName(String),
    /// Exact coast.
    Coast(String),
    /// Origin contains the text.
    Origin(String),
    /// Column is not null.
    NotNull(&'static str),
    /// Price is present and positive.
    PositivePrice,
    /// Principal or species name is present.
    Named,
}

/// Escape LIKE wildcards and wrap the text as a substring pattern.
pub fn like_pattern(raw: &str) -> String {
    let mut pattern = String::with_capacity(raw.len() + 2);
    pattern.push('%');
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl Condition {
    fn push(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        match self {
            Condition::Year(year) => {
                qb.push("ano_corte = ").push_bind(*year);
            }
            Condition::YearRange(from, to) => {
                qb.push("ano_corte BETWEEN ")
                    .push_bind(*from)
                    .push(" AND ")
                    .push_bind(*to);
            }
            Condition::State(text) => {
                qb.push("nombre_estado ILIKE ").push_bind(like_pattern(text));
            }
            Condition::Principal(text) => {
                qb.push("nombre_principal ILIKE ").push_bind(like_pattern(text));
            }
            Condition::AnySpeciesName(text) => {
                let pattern = like_pattern(text);
                qb.push("(nombre_principal ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR nombre_especie ILIKE ")
                    .push_bind(pattern)
                    .push(")");
            }
            Condition::Coast(text) => {
                qb.push("litoral = ").push_bind(text.clone());
            }
            Condition::Origin(text) => {
                qb.push("origen ILIKE ").push_bind(like_pattern(text));
            }
            Condition::NotNull(column) => {
                qb.push(*column).push(" IS NOT NULL");
            }
            Condition::PositivePrice => {
                qb.push("precio_pesos IS NOT NULL AND precio_pesos > 0");
            }
            Condition::Named => {
                qb.push("(nombre_principal IS NOT NULL OR nombre_especie IS NOT NULL)");
            }
        }
    }
}

/// Append a `WHERE` clause. Nothing is appended for an empty slice.
pub fn push_where(qb: &mut QueryBuilder<'static, Postgres>, conditions: &[Condition]) {
    for (i, condition) in conditions.iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        condition.push(qb);
    }
}

/// Year scope shared by statistics and record queries.
///
/// A range applies only when both bounds are given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YearScope {
    pub year: Option<i32>,
    pub from: Option<i32>,
    pub to: Option<i32>,
}

impl YearScope {
    pub fn range(&self) -> Option<Condition> {
        match (self.from, self.to) {
            (Some(from), Some(to)) => Some(Condition::YearRange(from, to)),
            _ => None,
        }
    }

    pub fn exact(&self) -> Option<Condition> {
        self.year.map(Condition::Year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(conditions: &[Condition]) -> String {
        let mut qb = QueryBuilder::new("SELECT * FROM produccion_pesquera");
        push_where(&mut qb, conditions);
        qb.sql().to_string()
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("pulpo"), "%pulpo%");
        assert_eq!(like_pattern("50%_a\\b"), "%50\\%\\_a\\\\b%");
    }

    #[test]
    fn test_empty_conditions() {
        assert_eq!(compile(&[]), "SELECT * FROM produccion_pesquera");
    }

    #[test]
    fn test_binds_in_order() {
        let sql = compile(&[
            Condition::YearRange(2018, 2020),
            Condition::State("Yucatán".to_string()),
            Condition::AnySpeciesName("pulpo".to_string()),
        ]);
        assert_eq!(
            sql,
            "SELECT * FROM produccion_pesquera WHERE ano_corte BETWEEN $1 AND $2 \
             AND nombre_estado ILIKE $3 AND (nombre_principal ILIKE $4 OR nombre_especie ILIKE $5)"
        );
    }

    #[test]
    fn test_static_conditions() {
        let sql = compile(&[Condition::NotNull("litoral"), Condition::PositivePrice]);
        assert!(sql.ends_with("WHERE litoral IS NOT NULL AND precio_pesos IS NOT NULL AND precio_pesos > 0"));
    }

    #[test]
    fn test_year_scope_needs_both_bounds() {
        let scope = YearScope {
            from: Some(2010),
            ..Default::default()
        };
        assert!(scope.range().is_none());
        let scope = YearScope {
            from: Some(2010),
            to: Some(2012),
            year: Some(2011),
        };
        assert_eq!(scope.range(), Some(Condition::YearRange(2010, 2012)));
        assert_eq!(scope.exact(), Some(Condition::Year(2011)));
    }
}
