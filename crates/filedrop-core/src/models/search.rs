use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use validator::{Validate, ValidationError};

use crate::error::AppError;

/// Columns a search may be ordered by.
///
/// Caller-supplied sort text is only ever turned into one of these variants;
/// the SQL column name comes from [`SortField::column`], never from input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Name,
    Size,
    #[serde(rename = "type")]
    FileType,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Size => "size",
            SortField::FileType => "file_type",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }
}

impl Display for SortField {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.column())
    }
}

impl FromStr for SortField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortField::Name),
            "size" => Ok(SortField::Size),
            "type" | "file_type" => Ok(SortField::FileType),
            "created_at" => Ok(SortField::CreatedAt),
            "updated_at" => Ok(SortField::UpdatedAt),
            _ => Err(AppError::InvalidInput(format!("Invalid sort field: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(AppError::InvalidInput(format!(
                "Invalid sort direction: {}",
                s
            ))),
        }
    }
}

/// Filters for an owner-scoped file search. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_created_range"))]
pub struct FileSearchParams {
    /// Case-insensitive substring of the file name
    #[validate(length(max = 255, message = "Query must be at most 255 characters"))]
    pub query: Option<String>,
    /// Exact file type (extension without the dot)
    #[validate(length(max = 32, message = "File type must be at most 32 characters"))]
    pub file_type: Option<String>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    pub sort_by: Option<SortField>,
    pub sort_dir: Option<SortDirection>,
    #[validate(range(min = 1, max = 1000, message = "Limit must be between 1 and 1000"))]
    pub limit: Option<i64>,
    #[validate(range(min = 0, message = "Offset must not be negative"))]
    pub offset: Option<i64>,
}

impl FileSearchParams {
    /// Ordering actually applied: `created_at DESC` unless overridden.
    pub fn ordering(&self) -> (SortField, SortDirection) {
        (
            self.sort_by.unwrap_or(SortField::CreatedAt),
            self.sort_dir.unwrap_or_default(),
        )
    }
}

fn validate_created_range(params: &FileSearchParams) -> Result<(), ValidationError> {
    if let (Some(from), Some(to)) = (params.created_from, params.created_to) {
        if from > to {
            let mut err = ValidationError::new("created_range");
            err.message = Some("created_from must not be after created_to".into());
            return Err(err);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_sort_field_parses_allowed_columns() {
        assert_eq!("name".parse::<SortField>().unwrap(), SortField::Name);
        assert_eq!("Size".parse::<SortField>().unwrap(), SortField::Size);
        assert_eq!("type".parse::<SortField>().unwrap(), SortField::FileType);
        assert_eq!(
            "created_at".parse::<SortField>().unwrap(),
            SortField::CreatedAt
        );
    }

    #[test]
    fn test_sort_field_rejects_injection() {
        let err = "id; DROP TABLE files".parse::<SortField>().unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!("id".parse::<SortField>().is_err());
    }

    #[test]
    fn test_sort_field_deserialize_rejects_unknown() {
        let parsed: Result<SortField, _> = serde_json::from_str("\"owner_id\"");
        assert!(parsed.is_err());
        let parsed: SortField = serde_json::from_str("\"type\"").unwrap();
        assert_eq!(parsed, SortField::FileType);
    }

    #[test]
    fn test_default_ordering_is_created_at_desc() {
        let params = FileSearchParams::default();
        assert_eq!(
            params.ordering(),
            (SortField::CreatedAt, SortDirection::Desc)
        );

        let params = FileSearchParams {
            sort_by: Some(SortField::Name),
            ..Default::default()
        };
        assert_eq!(params.ordering(), (SortField::Name, SortDirection::Desc));
    }

    #[test]
    fn test_validate_limit_and_offset() {
        let params = FileSearchParams {
            limit: Some(0),
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = FileSearchParams {
            offset: Some(-1),
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = FileSearchParams {
            limit: Some(50),
            offset: Some(100),
            ..Default::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_created_range() {
        let now = Utc::now();
        let params = FileSearchParams {
            created_from: Some(now),
            created_to: Some(now - Duration::days(1)),
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }
}
