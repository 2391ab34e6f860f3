//! Outbound request representation handed from the connectors to the
//! HTTP client.

use serde::{Deserialize, Serialize};

use crate::masking::Maskable;

pub type Headers = Vec<(String, Maskable<String>)>;

#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// Body of an outbound gateway request. Serialization of the inner
/// value happens at send time in the HTTP client.
pub enum RequestContent {
    Json(Box<dyn erased_serde::Serialize + Send>),
    FormUrlEncoded(Box<dyn erased_serde::Serialize + Send>),
}

impl std::fmt::Debug for RequestContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Json(_) => "JsonRequestBody",
            Self::FormUrlEncoded(_) => "FormUrlEncodedRequestBody",
        })
    }
}

#[derive(Debug)]
pub struct Request {
    pub url: String,
    pub headers: Headers,
    pub method: Method,
    pub body: Option<RequestContent>,
}

impl Request {
    pub fn new(method: Method, url: &str) -> Self {
        Self {
            method,
            url: String::from(url),
            headers: Headers::new(),
            body: None,
        }
    }

    pub fn set_body(&mut self, body: RequestContent) {
        self.body.replace(body);
    }

    pub fn add_header(&mut self, header: &str, value: Maskable<String>) {
        self.headers.push((String::from(header), value));
    }
}

#[derive(Debug)]
pub struct RequestBuilder {
    pub url: String,
    pub headers: Headers,
    pub method: Method,
    pub body: Option<RequestContent>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: Method::Get,
            url: String::with_capacity(1024),
            headers: Headers::new(),
            body: None,
        }
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = url.into();
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn header(mut self, header: &str, value: &str) -> Self {
        self.headers.push((header.into(), value.to_string().into()));
        self
    }

    pub fn headers(mut self, headers: Vec<(String, Maskable<String>)>) -> Self {
        let mut h = headers.into_iter().collect::<Vec<_>>();
        self.headers.append(&mut h);
        self
    }

    pub fn set_optional_body<T: Into<RequestContent>>(mut self, body: Option<T>) -> Self {
        if let Some(body) = body {
            self.body.replace(body.into());
        }
        self
    }

    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn method_renders_and_parses_uppercase() {
        assert_eq!(Method::Post.to_string(), "POST");
        assert_eq!("DELETE".parse::<Method>().unwrap(), Method::Delete);
    }

    #[test]
    fn builder_assembles_the_request() {
        let request = RequestBuilder::new()
            .method(Method::Post)
            .url("https://api.example.com/checkout")
            .header("Content-Type", "application/json")
            .build();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url, "https://api.example.com/checkout");
        assert_eq!(request.headers.len(), 1);
        assert!(request.body.is_none());
    }
}
