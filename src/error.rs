use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Collaborator {
    #[display("fee calculator")]
    Fees,
    #[display("coinbase builder")]
    Coinbase,
    #[display("merkle hasher")]
    Merkle,
}

/// Why a template could not be built. Either way it must not reach miners.
#[derive(Debug, Snafu)]
pub enum TemplateError {
    #[snafu(display("malformed template field `{field}`: {message}"))]
    MalformedTemplate { field: &'static str, message: String },

    #[snafu(display("{collaborator} failed: {source}"))]
    CollaboratorFailure {
        collaborator: Collaborator,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl TemplateError {
    pub(crate) fn malformed(field: &'static str, message: impl fmt::Display) -> Self {
        Self::MalformedTemplate {
            field,
            message: message.to_string(),
        }
    }

    pub(crate) fn collaborator_failure(collaborator: Collaborator, source: Error) -> Self {
        Self::CollaboratorFailure {
            collaborator,
            source: source.into(),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedTemplate { .. })
    }
}
