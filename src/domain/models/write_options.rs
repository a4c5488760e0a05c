/// Options applied to a single write.
///
/// The default is a private object with no explicit content type, which
/// leaves content-type selection to the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOptions {
    pub content_type: Option<String>,
    pub is_public: bool,
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Make the object readable without authentication
    pub fn public(mut self) -> Self {
        self.is_public = true;
        self
    }
}

/// Operation a signed URL grants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignedUrlMethod {
    Read,
    Write,
}

impl SignedUrlMethod {
    pub fn as_http(&self) -> http::Method {
        match self {
            SignedUrlMethod::Read => http::Method::GET,
            SignedUrlMethod::Write => http::Method::PUT,
        }
    }
}

impl std::fmt::Display for SignedUrlMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignedUrlMethod::Read => write!(f, "read"),
            SignedUrlMethod::Write => write!(f, "write"),
        }
    }
}
