//! SQL builder for patient listings.
//!
//! The count and the page fetch are generated from the same WHERE clause so
//! totals always agree with the rows returned.

use rusqlite::ToSql;
use rusqlite::types::ToSqlOutput;

use crate::types::{PageRequest, PatientFilter};

use super::backend::FOLD_CASE_FN;

/// Columns selected for a joined patient row, in the order the row mapper
/// reads them.
pub(crate) const PATIENT_COLUMNS: &str = "p.id, p.identification_type_code, \
     p.identification_number, p.first_given_name, p.second_given_name, \
     p.first_family_name, p.second_family_name, p.full_name, p.email, p.status, \
     p.created_at, p.created_by, p.modified_at, p.modified_by, \
     t.code, t.name, t.status";

/// Join between patients and their identification type.
pub(crate) const PATIENT_FROM: &str =
    "patients p JOIN identification_types t ON t.code = p.identification_type_code";

/// A bound SQL parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// String parameter.
    String(String),
    /// Integer parameter.
    Integer(i64),
}

impl ToSql for SqlParam {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            SqlParam::String(s) => s.to_sql(),
            SqlParam::Integer(i) => i.to_sql(),
        }
    }
}

/// A fragment of SQL with bound parameters.
#[derive(Debug, Clone, Default)]
pub struct SqlFragment {
    /// The SQL text.
    pub sql: String,
    /// Bound parameter values.
    pub params: Vec<SqlParam>,
}

impl SqlFragment {
    /// Adds a parameter and returns its placeholder.
    fn add_param(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        format!("?{}", self.params.len())
    }

    /// Returns the parameters as trait objects for rusqlite.
    pub fn param_refs(&self) -> Vec<&dyn ToSql> {
        self.params.iter().map(|p| p as &dyn ToSql).collect()
    }
}

/// Builds the WHERE clause for a patient filter.
#[derive(Debug)]
pub struct PatientQueryBuilder<'a> {
    filter: &'a PatientFilter,
}

impl<'a> PatientQueryBuilder<'a> {
    /// Creates a builder for `filter`.
    pub fn new(filter: &'a PatientFilter) -> Self {
        Self { filter }
    }

    fn where_clause(&self) -> SqlFragment {
        let mut fragment = SqlFragment::default();
        let mut conditions = Vec::new();

        let placeholder = fragment.add_param(SqlParam::String(
            self.filter.effective_status().to_string(),
        ));
        conditions.push(format!("p.status = {}", placeholder));

        if let Some(number) = self.filter.identification_number() {
            let placeholder = fragment.add_param(SqlParam::String(number.to_string()));
            conditions.push(format!("p.identification_number = {}", placeholder));
        }

        // instr() instead of LIKE so % and _ in user input match literally.
        if let Some(name) = self.filter.full_name() {
            let placeholder = fragment.add_param(SqlParam::String(name.to_lowercase()));
            conditions.push(format!(
                "instr({f}(p.full_name), {p}) > 0",
                f = FOLD_CASE_FN,
                p = placeholder
            ));
        }

        if let Some(email) = self.filter.email() {
            let placeholder = fragment.add_param(SqlParam::String(email.to_lowercase()));
            conditions.push(format!(
                "instr({f}(p.email), {p}) > 0",
                f = FOLD_CASE_FN,
                p = placeholder
            ));
        }

        fragment.sql = conditions.join(" AND ");
        fragment
    }

    /// Builds the `COUNT(*)` query.
    pub fn build_count(&self) -> SqlFragment {
        let mut fragment = self.where_clause();
        fragment.sql = format!("SELECT COUNT(*) FROM patients p WHERE {}", fragment.sql);
        fragment
    }

    /// Builds the page fetch, newest id first.
    pub fn build_page(&self, page: PageRequest) -> SqlFragment {
        let mut fragment = self.where_clause();
        let limit = fragment.add_param(SqlParam::Integer(i64::from(page.page_size())));
        let offset = fragment.add_param(SqlParam::Integer(
            i64::try_from(page.offset()).unwrap_or(i64::MAX),
        ));
        fragment.sql = format!(
            "SELECT {} FROM {} WHERE {} ORDER BY p.id DESC LIMIT {} OFFSET {}",
            PATIENT_COLUMNS, PATIENT_FROM, fragment.sql, limit, offset
        );
        fragment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_only_matches_active() {
        let filter = PatientFilter::default();
        let count = PatientQueryBuilder::new(&filter).build_count();
        assert_eq!(
            count.sql,
            "SELECT COUNT(*) FROM patients p WHERE p.status = ?1"
        );
        assert_eq!(count.params, vec![SqlParam::String("A".to_string())]);
    }

    #[test]
    fn test_all_criteria() {
        let filter = PatientFilter {
            identification_number: Some("111".to_string()),
            full_name: Some("PÉREZ".to_string()),
            email: Some("Example".to_string()),
            status: Some("I".to_string()),
        };
        let count = PatientQueryBuilder::new(&filter).build_count();
        assert!(count.sql.contains("p.identification_number = ?2"));
        assert!(count.sql.contains("instr(fold_case(p.full_name), ?3) > 0"));
        assert!(count.sql.contains("instr(fold_case(p.email), ?4) > 0"));
        assert_eq!(count.params[2], SqlParam::String("pérez".to_string()));
        assert_eq!(count.params[3], SqlParam::String("example".to_string()));
    }

    #[test]
    fn test_page_shares_where_clause() {
        let filter = PatientFilter {
            email: Some("ana".to_string()),
            ..Default::default()
        };
        let builder = PatientQueryBuilder::new(&filter);
        let page = builder.build_page(PageRequest::new(3, 10));

        assert!(page.sql.contains("ORDER BY p.id DESC LIMIT ?3 OFFSET ?4"));
        assert_eq!(page.params[2], SqlParam::Integer(10));
        assert_eq!(page.params[3], SqlParam::Integer(20));
        assert_eq!(&page.params[..2], &builder.build_count().params[..]);
    }
}
