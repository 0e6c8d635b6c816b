use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sample document written by the diagnostic run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    pub user: String,
    pub message: String,
    pub retweets: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(
        rename = "suggest_field",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub suggest: Option<SuggestField>,
}

impl Tweet {
    pub fn new(user: impl Into<String>, message: impl Into<String>, retweets: i64) -> Self {
        Self {
            user: user.into(),
            message: message.into(),
            retweets,
            image: None,
            created: None,
            tags: None,
            location: None,
            suggest: None,
        }
    }
}

/// Completion suggester input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestField {
    pub input: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i32>,
}

/// Address of a single document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub index: String,
    pub doc_type: String,
    pub id: String,
}

impl DocumentRef {
    pub fn new(
        index: impl Into<String>,
        doc_type: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            index: index.into(),
            doc_type: doc_type.into(),
            id: id.into(),
        }
    }

    pub fn segments(&self) -> [&str; 3] {
        [&self.index, &self.doc_type, &self.id]
    }
}

/// Document payload, either a serialized value or a pre-serialized JSON string
#[derive(Debug, Clone)]
pub enum DocumentBody {
    Json(serde_json::Value),
    Raw(String),
}

impl DocumentBody {
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    pub fn into_bytes(self) -> Result<Vec<u8>, serde_json::Error> {
        match self {
            DocumentBody::Json(value) => serde_json::to_vec(&value),
            DocumentBody::Raw(raw) => Ok(raw.into_bytes()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn minimal_tweet_omits_optional_fields() {
        let value = serde_json::to_value(Tweet::new("olivere", "Take Five", 0)).unwrap();

        assert_eq!(
            value,
            json!({"user": "olivere", "message": "Take Five", "retweets": 0})
        );
    }

    #[test]
    fn full_tweet_uses_wire_names() {
        let tweet = Tweet {
            image: Some("http://img/1.png".to_string()),
            created: Some(Utc.with_ymd_and_hms(2017, 3, 1, 12, 0, 0).unwrap()),
            tags: Some(vec!["jazz".to_string()]),
            location: Some("41.12,-71.34".to_string()),
            suggest: Some(SuggestField {
                input: vec!["Take Five".to_string()],
                weight: Some(3),
            }),
            ..Tweet::new("olivere", "Take Five", 2)
        };

        let value = serde_json::to_value(&tweet).unwrap();
        assert_eq!(value["created"], "2017-03-01T12:00:00Z");
        assert_eq!(value["suggest_field"]["input"][0], "Take Five");
        assert_eq!(value["suggest_field"]["weight"], 3);
        assert_eq!(value["tags"], json!(["jazz"]));
    }

    #[test]
    fn raw_body_is_sent_verbatim() {
        let raw = r#"{"user" : "olivere", "message" : "It's a Raggy Waltz"}"#;
        let bytes = DocumentBody::Raw(raw.to_string()).into_bytes().unwrap();

        assert_eq!(bytes, raw.as_bytes());
    }
}
