//! Listing filters and their translation into API query parameters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::ticket::TicketStatus;

/// Page requested when none is given.
pub const DEFAULT_PAGE: usize = 1;

/// Criteria narrowing the ticket listing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketFilters {
    pub status: Option<TicketStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub code: Option<String>,
    pub prefix: Option<String>,
}

fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TicketFilters {
    /// Trims free-text criteria, drops blanks and orders the date range.
    pub fn normalized(self) -> Self {
        let (start_date, end_date) = match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start > end => (Some(end), Some(start)),
            range => range,
        };
        Self {
            status: self.status,
            start_date,
            end_date,
            code: clean_text(self.code).map(|c| c.to_uppercase()),
            prefix: clean_text(self.prefix).map(|p| p.to_uppercase()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.code.is_none()
            && self.prefix.is_none()
    }

    /// Builds the query string pairs for `GET /bilhetes`.
    ///
    /// `pagina` and `limite` are only included when they differ from the
    /// defaults, so an unfiltered first page is requested without parameters.
    pub fn to_query_pairs(
        &self,
        page: usize,
        page_size: usize,
        default_page_size: usize,
    ) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.code().to_string()));
        }
        if let Some(start) = self.start_date {
            pairs.push(("dataInicio", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("dataFim", end.format("%Y-%m-%d").to_string()));
        }
        if let Some(code) = &self.code {
            pairs.push(("codigo", code.clone()));
        }
        if let Some(prefix) = &self.prefix {
            pairs.push(("prefixo", prefix.clone()));
        }
        if page != DEFAULT_PAGE {
            pairs.push(("pagina", page.to_string()));
        }
        if page_size != default_page_size {
            pairs.push(("limite", page_size.to_string()));
        }
        pairs
    }
}
