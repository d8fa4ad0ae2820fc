use serde::{Deserialize, Deserializer};
use serde_aux::field_attributes::{deserialize_number_from_string, deserialize_string_from_number};

pub const FIRST_PAGE: i64 = 1;

pub fn first_page() -> i64 {
    FIRST_PAGE
}

// anything in `?page=` that is not an integer means the first page
pub fn deserialize_page<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(FIRST_PAGE))
}

/// Question id as sent by the quiz client, either `3` or `"3"`.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct QuestionId(#[serde(deserialize_with = "deserialize_number_from_string")] pub i64);

#[derive(Deserialize)]
struct CategoryRef(#[serde(deserialize_with = "deserialize_string_from_number")] String);

/// Category id as sent by the quiz client: `1`, `"1"` or `null`.
/// Pair with `#[serde(default)]`: an absent field stays `None`, an explicit
/// `null` becomes `Some(None)`.
pub fn deserialize_nullable_category_id<'de, D>(
    deserializer: D,
) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<CategoryRef>::deserialize(deserializer)?;
    Ok(Some(value.map(|CategoryRef(id)| id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct PageQuery {
        #[serde(default = "first_page", deserialize_with = "deserialize_page")]
        page: i64,
    }

    #[derive(Deserialize)]
    struct CategoryField {
        #[serde(default, deserialize_with = "deserialize_nullable_category_id")]
        id: Option<Option<String>>,
    }

    fn page_of(query: &str) -> i64 {
        serde_json::from_str::<PageQuery>(query).unwrap().page
    }

    #[test]
    fn page_falls_back_to_first() {
        assert_eq!(page_of(r#"{}"#), 1);
        assert_eq!(page_of(r#"{"page": "abc"}"#), 1);
        assert_eq!(page_of(r#"{"page": ""}"#), 1);
        assert_eq!(page_of(r#"{"page": "3"}"#), 3);
        assert_eq!(page_of(r#"{"page": "-2"}"#), -2);
    }

    #[test]
    fn question_ids_accept_numbers_and_strings() {
        let ids: Vec<QuestionId> = serde_json::from_str(r#"[1, "2", 30]"#).unwrap();
        assert_eq!(ids, vec![QuestionId(1), QuestionId(2), QuestionId(30)]);
        assert!(serde_json::from_str::<Vec<QuestionId>>(r#"["two"]"#).is_err());
    }

    #[test]
    fn category_id_tells_null_from_absent() {
        let id_of = |json: &str| serde_json::from_str::<CategoryField>(json).unwrap().id;
        assert_eq!(id_of(r#"{}"#), None);
        assert_eq!(id_of(r#"{"id": null}"#), Some(None));
        assert_eq!(id_of(r#"{"id": 2}"#), Some(Some("2".to_owned())));
        assert_eq!(id_of(r#"{"id": "2"}"#), Some(Some("2".to_owned())));
    }
}
