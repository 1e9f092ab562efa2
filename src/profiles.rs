//! Pass-through access to the remote `profiles` table. No caching and no
//! validation; whatever the service answers is returned or reported as is.

use reqwest::blocking::RequestBuilder;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::backend::{Backend, RemoteError};

const TABLE: &str = "profiles";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct NewProfile<'a> {
    #[serde(rename = "nombre")]
    name: &'a str,
    email: &'a str,
    #[serde(rename = "telefono")]
    phone: Option<&'a str>,
}

/// Partial update; unset fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileChanges {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProfilesTable {
    backend: Backend,
    access_token: Option<String>,
}

impl ProfilesTable {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            access_token: None,
        }
    }

    /// Act as a signed-in user instead of the anonymous role
    pub fn with_access_token(mut self, token: &str) -> Self {
        self.access_token = Some(token.to_string());
        self
    }

    fn request(&self, method: Method) -> RequestBuilder {
        let url = self.backend.rest_url(TABLE);
        match &self.access_token {
            Some(token) => self.backend.request_as(method, &url, token),
            None => self.backend.request(method, &url),
        }
    }

    fn by_id(&self, method: Method, id: &str) -> RequestBuilder {
        let filter = format!("eq.{id}");
        self.request(method).query(&[("id", filter.as_str())])
    }

    pub fn create_request(&self, name: &str, email: &str, phone: Option<&str>) -> RequestBuilder {
        self.request(Method::POST)
            .header("Prefer", "return=representation")
            .json(&NewProfile { name, email, phone })
    }

    pub fn list_request(&self) -> RequestBuilder {
        self.request(Method::GET).query(&[("select", "*")])
    }

    pub fn update_request(&self, id: &str, changes: &ProfileChanges) -> RequestBuilder {
        self.by_id(Method::PATCH, id)
            .header("Prefer", "return=representation")
            .json(changes)
    }

    pub fn delete_request(&self, id: &str) -> RequestBuilder {
        self.by_id(Method::DELETE, id)
    }

    pub fn create(
        &self,
        name: &str,
        email: &str,
        phone: Option<&str>,
    ) -> Result<Vec<ProfileRecord>, RemoteError> {
        tracing::debug!(email, "creating profile");
        let body = self.backend.send(self.create_request(name, email, phone))?;
        parse_records(&body)
    }

    pub fn list(&self) -> Result<Vec<ProfileRecord>, RemoteError> {
        let body = self.backend.send(self.list_request())?;
        parse_records(&body)
    }

    pub fn update(
        &self,
        id: &str,
        changes: &ProfileChanges,
    ) -> Result<Vec<ProfileRecord>, RemoteError> {
        tracing::debug!(id, "updating profile");
        let body = self.backend.send(self.update_request(id, changes))?;
        parse_records(&body)
    }

    pub fn delete(&self, id: &str) -> Result<(), RemoteError> {
        tracing::debug!(id, "deleting profile");
        self.backend.send(self.delete_request(id)).map(|_| ())
    }
}

fn parse_records(body: &str) -> Result<Vec<ProfileRecord>, RemoteError> {
    serde_json::from_str(body).map_err(|e| RemoteError(format!("unexpected profiles response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ProfilesTable {
        ProfilesTable::new(Backend::new("https://demo.supabase.co", "anon").unwrap())
    }

    fn body(request: &reqwest::blocking::Request) -> serde_json::Value {
        serde_json::from_slice(request.body().and_then(|b| b.as_bytes()).unwrap()).unwrap()
    }

    #[test]
    fn test_create_request() {
        let request = table()
            .create_request("Ana", "ana@example.com", None)
            .build()
            .unwrap();

        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.url().path(), "/rest/v1/profiles");
        assert_eq!(request.headers()["prefer"], "return=representation");
        assert_eq!(
            body(&request),
            serde_json::json!({"nombre": "Ana", "email": "ana@example.com", "telefono": null})
        );
    }

    #[test]
    fn test_update_and_delete_filter_by_id() {
        let t = table();
        let changes = ProfileChanges {
            phone: Some("555-0100".into()),
            ..ProfileChanges::default()
        };

        let update = t.update_request("42", &changes).build().unwrap();
        assert_eq!(update.method(), Method::PATCH);
        assert_eq!(update.url().query(), Some("id=eq.42"));
        assert_eq!(body(&update), serde_json::json!({"telefono": "555-0100"}));

        let delete = t.delete_request("42").build().unwrap();
        assert_eq!(delete.method(), Method::DELETE);
        assert_eq!(delete.url().query(), Some("id=eq.42"));
    }

    #[test]
    fn test_user_token_is_used_when_set() {
        let request = table()
            .with_access_token("user-jwt")
            .list_request()
            .build()
            .unwrap();

        assert_eq!(request.headers()["apikey"], "anon");
        assert_eq!(request.headers()["authorization"], "Bearer user-jwt");
        assert_eq!(request.url().query(), Some("select=*"));
    }

    #[test]
    fn test_parse_records() {
        let records = parse_records(
            r#"[{"id":"1","nombre":"Ana","email":"ana@example.com","telefono":null,"created_at":"2025-01-01"}]"#,
        )
        .unwrap();

        assert_eq!(
            records,
            vec![ProfileRecord {
                id: "1".into(),
                name: "Ana".into(),
                email: "ana@example.com".into(),
                phone: None,
            }]
        );
        assert!(parse_records(r#"{"oops":true}"#).is_err());
    }
}
