//! Query shapes: filtering, pagination and paged responses

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::plan::PlanStatus;

/// Optional filters applied to plan listings and searches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub user_email: Option<String>,
    pub destination: Option<String>,
    pub status: Option<PlanStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

/// Sort order, rendered on the wire as `field,direction`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortOptions {
    pub field: String,
    pub direction: SortDirection,
}

impl std::fmt::Display for SortOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.field, self.direction)
    }
}

impl std::str::FromStr for SortOptions {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match s.split_once(',') {
            Some((field, dir)) => {
                let direction = match dir.trim().to_ascii_lowercase().as_str() {
                    "asc" => SortDirection::Asc,
                    "desc" => SortDirection::Desc,
                    other => return Err(format!("invalid sort direction: {}", other)),
                };
                (field.trim(), direction)
            }
            None => (s.trim(), SortDirection::Asc),
        };

        if field.is_empty() {
            return Err("sort field cannot be empty".to_string());
        }

        Ok(Self {
            field: field.to_string(),
            direction,
        })
    }
}

/// Page selection for listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationOptions {
    pub page: u32,
    pub size: u32,
    pub sort: Option<SortOptions>,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            page: 0,
            size: 20,
            sort: None,
        }
    }
}

/// Query string sent by plan listing and search endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PlanStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub page: u32,
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

impl PlanQuery {
    /// Combine an optional search term with filters and a page selection
    pub fn new(q: Option<&str>, filters: FilterOptions, pagination: &PaginationOptions) -> Self {
        Self {
            q: q.map(str::to_string),
            user_email: filters.user_email,
            destination: filters.destination,
            status: filters.status,
            start_date: filters.start_date,
            end_date: filters.end_date,
            page: pagination.page,
            size: pagination.size,
            sort: pagination.sort.as_ref().map(ToString::to_string),
        }
    }
}

/// Sort metadata reported by the server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SortInfo {
    #[serde(default)]
    pub empty: bool,
    #[serde(default)]
    pub sorted: bool,
    #[serde(default)]
    pub unsorted: bool,
}

/// Page request echoed back by the server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pageable {
    pub page_number: u32,
    pub page_size: u32,
    #[serde(default)]
    pub sort: SortInfo,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub paged: bool,
    #[serde(default)]
    pub unpaged: bool,
}

/// One page of a server-side listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub pageable: Option<Pageable>,
    pub total_pages: u32,
    pub total_elements: u64,
    #[serde(default)]
    pub last: bool,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub number_of_elements: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub sort: Option<SortInfo>,
    #[serde(default)]
    pub empty: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_renders_field_and_direction() {
        let sort = SortOptions {
            field: "startDate".to_string(),
            direction: SortDirection::Desc,
        };
        assert_eq!(sort.to_string(), "startDate,desc");
        assert_eq!("startDate,desc".parse::<SortOptions>().unwrap(), sort);
        assert_eq!(
            "title".parse::<SortOptions>().unwrap().direction,
            SortDirection::Asc
        );
        assert!(",asc".parse::<SortOptions>().is_err());
        assert!("title,sideways".parse::<SortOptions>().is_err());
    }

    #[test]
    fn test_plan_query_skips_unset_filters() {
        let query = PlanQuery::new(
            Some("beach"),
            FilterOptions {
                status: Some(PlanStatus::Draft),
                ..Default::default()
            },
            &PaginationOptions::default(),
        );
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "q": "beach", "status": "DRAFT", "page": 0, "size": 20 })
        );
    }

    #[test]
    fn test_paged_response_tolerates_minimal_payload() {
        let page: PagedResponse<u32> = serde_json::from_value(serde_json::json!({
            "content": [1, 2],
            "totalPages": 1,
            "totalElements": 2
        }))
        .unwrap();
        assert_eq!(page.content, vec![1, 2]);
        assert!(page.pageable.is_none());
    }
}
