//! Load-time errors for knowledge bases, preference profiles and rule
//! catalogs.
//!
//! Nothing past loading can fail: once these inputs are accepted the rule
//! engine runs to completion.

/// A knowledge base document that cannot be used for inference.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeBaseError {
    /// The document is not valid JSON or does not have the expected shape.
    #[error("invalid knowledge base: {0}")]
    Json(#[from] serde_json::Error),

    /// A declared destination has an empty name.
    #[error("destination names must not be empty")]
    EmptyDestination,

    /// The same destination appears twice in the declared list.
    #[error("destination declared twice: {destination}")]
    DuplicateDestination { destination: String },

    /// A predicate, best-season or tip entry names a destination that is not
    /// in the declared destination list.
    #[error("{section} references undeclared destination '{destination}'")]
    UndeclaredDestination {
        section: String,
        destination: String,
    },
}

/// A preference profile that cannot be parsed.
///
/// Unknown values for enumerated fields land here; missing fields do not.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("invalid TOML profile: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON profile: {0}")]
    Json(#[from] serde_json::Error),
}

/// A rule catalog document that cannot be parsed.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid rule catalog: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undeclared_destination_display() {
        let err = KnowledgeBaseError::UndeclaredDestination {
            section: "predicate 'expensive'".to_string(),
            destination: "Atlantis".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "predicate 'expensive' references undeclared destination 'Atlantis'"
        );
    }

    #[test]
    fn duplicate_destination_display() {
        let err = KnowledgeBaseError::DuplicateDestination {
            destination: "Italy".to_string(),
        };
        assert_eq!(err.to_string(), "destination declared twice: Italy");
    }
}
