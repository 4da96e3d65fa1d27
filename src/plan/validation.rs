//! Plan validation.
//!
//! Plans usually come from files, so every field is checked before any of
//! it touches a scan.

use crate::error::ValidationError;

use super::document::{FilterSpec, ScanPlan, SourceSpec, TypeRef};

/// Conservative upper bound for free-form text fields.
pub const MAX_TEXT_LEN: usize = 4 * 1024;

fn validate_non_empty(field: &str, value: &str) -> Result<(), ValidationError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(ValidationError::MissingField {
            field: field.to_string(),
        });
    }
    validate_length(field, value)
}

fn validate_length(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.len() > MAX_TEXT_LEN {
        return Err(ValidationError::FieldTooLong {
            field: field.to_string(),
            max_length: MAX_TEXT_LEN,
        });
    }
    Ok(())
}

fn validate_type_ref(field: &str, ty: &TypeRef) -> Result<(), ValidationError> {
    validate_non_empty(&format!("{field}.module"), &ty.module)?;
    validate_length(&format!("{field}.namespace"), &ty.namespace)?;
    validate_non_empty(&format!("{field}.name"), &ty.name)
}

impl SourceSpec {
    /// Validate the source entry.
    pub fn validate(&self, field: &str) -> Result<(), ValidationError> {
        match self {
            Self::Module { module } => validate_non_empty(&format!("{field}.module"), module),
            Self::NamespaceOf { marker } => validate_type_ref(&format!("{field}.marker"), marker),
            Self::Types { types } => types
                .iter()
                .enumerate()
                .try_for_each(|(i, ty)| validate_type_ref(&format!("{field}.types[{i}]"), ty)),
        }
    }
}

impl FilterSpec {
    /// Validate the filter entry.
    pub fn validate(&self, field: &str) -> Result<(), ValidationError> {
        match self {
            Self::IncludeNamespace { prefix } | Self::ExcludeNamespace { prefix } => {
                validate_non_empty(&format!("{field}.prefix"), prefix)
            }
            Self::IncludeWhere { predicate } | Self::ExcludeWhere { predicate } => {
                validate_non_empty(&format!("{field}.predicate"), predicate)
            }
            Self::IncludeMatching { pattern } | Self::ExcludeMatching { pattern } => {
                validate_non_empty(&format!("{field}.pattern"), pattern)
            }
            Self::TypeList { include, exclude } => {
                for (i, ty) in include.iter().enumerate() {
                    validate_type_ref(&format!("{field}.include[{i}]"), ty)?;
                }
                for (i, ty) in exclude.iter().enumerate() {
                    validate_type_ref(&format!("{field}.exclude[{i}]"), ty)?;
                }
                Ok(())
            }
        }
    }
}

impl ScanPlan {
    /// Validate the whole plan.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.version != Self::CURRENT_VERSION {
            return Err(ValidationError::InvalidArgument {
                param: "version",
                reason: format!(
                    "unsupported plan version '{}' (expected '{}')",
                    self.version,
                    Self::CURRENT_VERSION
                ),
            });
        }
        for (i, source) in self.sources.iter().enumerate() {
            source.validate(&format!("sources[{i}]"))?;
        }
        for (i, filter) in self.filters.iter().enumerate() {
            filter.validate(&format!("filters[{i}]"))?;
        }
        Ok(())
    }
}
