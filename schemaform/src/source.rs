//! Schema source: loads the schema document from a file or over HTTP.

use std::{fmt, path::PathBuf, str::FromStr, time::Duration};

use serde_json::Value;

use crate::data::schema::SchemaError;

/// Where a schema document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    Path(PathBuf),
    Url(String),
}

impl FromStr for SchemaSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(SchemaSource::Url(s.to_string()))
        } else {
            Ok(SchemaSource::Path(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for SchemaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaSource::Path(p) => write!(f, "{}", p.display()),
            SchemaSource::Url(u) => f.write_str(u),
        }
    }
}

impl SchemaSource {
    /// Fetch and parse the schema document.
    ///
    /// Only JSON parsing is done here; the structure is checked when a form
    /// is initialized.
    pub async fn fetch(&self) -> Result<Value, SchemaError> {
        let content = match self {
            SchemaSource::Path(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| self.fetch_error(e))?
            }
            SchemaSource::Url(url) => self.download(url).await?,
        };
        info!("loaded schema from {self}");
        Ok(serde_json::from_str(&content)?)
    }

    async fn download(&self, url: &str) -> Result<String, SchemaError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| self.fetch_error(e))?;

        let response = client
            .get(url)
            .header("User-Agent", "schemaform")
            .send()
            .await
            .map_err(|e| self.fetch_error(e))?;

        if !response.status().is_success() {
            return Err(self.fetch_error(format!("HTTP error {}", response.status())));
        }

        response.text().await.map_err(|e| self.fetch_error(e))
    }

    fn fetch_error(&self, reason: impl fmt::Display) -> SchemaError {
        SchemaError::Fetch {
            location: self.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source() {
        assert_eq!(
            "https://example.com/schema.json".parse::<SchemaSource>().unwrap(),
            SchemaSource::Url("https://example.com/schema.json".to_string())
        );
        assert_eq!(
            "schemas/doc.json".parse::<SchemaSource>().unwrap(),
            SchemaSource::Path(PathBuf::from("schemas/doc.json"))
        );
    }

    #[tokio::test]
    async fn test_fetch_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(&path, r#"{"properties": {}}"#).unwrap();

        let value = SchemaSource::Path(path).fetch().await.unwrap();
        assert_eq!(value, serde_json::json!({"properties": {}}));
    }

    #[tokio::test]
    async fn test_fetch_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = SchemaSource::Path(dir.path().join("missing.json"));
        assert!(matches!(
            missing.fetch().await,
            Err(SchemaError::Fetch { .. })
        ));

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{").unwrap();
        assert!(matches!(
            SchemaSource::Path(path).fetch().await,
            Err(SchemaError::Parse(_))
        ));
    }
}
