use std::fmt;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure to obtain or decode a fetched resource.
///
/// `Fetch` covers unreachable resources and transport failures, `Parse`
/// covers malformed documents and series of the wrong length.
#[derive(Debug)]
pub enum LoadError {
    Fetch {
        resource: String,
        message: String,
        source: Option<BoxError>,
    },
    Parse {
        resource: String,
        message: String,
    },
}

impl LoadError {
    pub fn fetch(resource: impl Into<String>, message: impl Into<String>) -> Self {
        LoadError::Fetch {
            resource: resource.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn fetch_with_source(
        resource: impl Into<String>,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        LoadError::Fetch {
            resource: resource.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn parse(resource: impl Into<String>, message: impl Into<String>) -> Self {
        LoadError::Parse {
            resource: resource.into(),
            message: message.into(),
        }
    }

    pub fn resource(&self) -> &str {
        match self {
            LoadError::Fetch { resource, .. } | LoadError::Parse { resource, .. } => resource,
        }
    }

    pub fn is_fetch(&self) -> bool {
        matches!(self, LoadError::Fetch { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, LoadError::Parse { .. })
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Fetch {
                resource, message, ..
            } => write!(f, "fetch failed for {resource}: {message}"),
            LoadError::Parse { resource, message } => {
                write!(f, "parse failed for {resource}: {message}")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Fetch {
                source: Some(e), ..
            } => Some(e.as_ref() as _),
            _ => None,
        }
    }
}
