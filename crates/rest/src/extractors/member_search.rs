//! Member search filter extractor.

use axum::{extract::FromRequestParts, http::request::Parts};
use roster_persistence::types::SearchCondition;

use super::{parse_number, query_pairs};
use crate::error::RestError;

/// Axum extractor for the member search filters.
///
/// Recognized parameters: `username`, `teamName`, `ageGoe`, `ageLoe` and
/// `usernameContains`. Other parameters are ignored. When a parameter
/// repeats, the last value wins.
///
/// # Example
///
/// ```rust,ignore
/// use roster_rest::extractors::MemberSearch;
///
/// async fn handler(MemberSearch(cond): MemberSearch) {
///     println!("{:?}", cond.team_name);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemberSearch(pub SearchCondition);

impl MemberSearch {
    /// Builds the condition from query pairs.
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, RestError> {
        let mut cond = SearchCondition::new();
        for (name, value) in pairs {
            match name.as_str() {
                "username" => cond.username = Some(value.clone()),
                "teamName" => cond.team_name = Some(value.clone()),
                "ageGoe" => cond.age_goe = Some(parse_number(name, value)?),
                "ageLoe" => cond.age_loe = Some(parse_number(name, value)?),
                "usernameContains" => cond.username_contains = Some(value.clone()),
                _ => {}
            }
        }
        Ok(Self(cond))
    }
}

impl<S> FromRequestParts<S> for MemberSearch
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pairs = query_pairs(parts, state).await?;
        Self::from_pairs(&pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_all_filters() {
        let MemberSearch(cond) = MemberSearch::from_pairs(&pairs(&[
            ("username", "member1"),
            ("teamName", "teamA"),
            ("ageGoe", "10"),
            ("ageLoe", "40"),
            ("usernameContains", "mem"),
        ]))
        .unwrap();

        assert_eq!(
            cond,
            SearchCondition::new()
                .with_username("member1")
                .with_team_name("teamA")
                .with_age_goe(10)
                .with_age_loe(40)
                .with_username_contains("mem")
        );
    }

    #[test]
    fn test_no_filters() {
        let MemberSearch(cond) = MemberSearch::from_pairs(&[]).unwrap();
        assert!(cond.is_empty());
    }

    #[test]
    fn test_unknown_parameters_ignored() {
        let MemberSearch(cond) =
            MemberSearch::from_pairs(&pairs(&[("page", "1"), ("sort", "age,desc")])).unwrap();
        assert!(cond.is_empty());
    }

    #[test]
    fn test_invalid_age_rejected() {
        let err = MemberSearch::from_pairs(&pairs(&[("ageGoe", "ten")])).unwrap_err();
        assert!(err.to_string().contains("ageGoe"));
    }

    #[test]
    fn test_last_value_wins() {
        let MemberSearch(cond) =
            MemberSearch::from_pairs(&pairs(&[("username", "a"), ("username", "b")])).unwrap();
        assert_eq!(cond.username.as_deref(), Some("b"));
    }
}
