//! Paginated listing responses.

use serde::{Deserialize, Serialize};

use crate::domain::ticket::Ticket;

/// Pagination metadata recomputed by the API on every list call.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageInfo {
    #[serde(rename = "paginaAtual")]
    pub current_page: usize,
    #[serde(rename = "itensPorPagina")]
    pub per_page: usize,
    #[serde(rename = "totalItens")]
    pub total_items: usize,
    #[serde(rename = "totalPaginas")]
    pub total_pages: usize,
    #[serde(rename = "temPaginaAnterior")]
    pub has_previous: bool,
    #[serde(rename = "temProximaPagina")]
    pub has_next: bool,
}

impl PageInfo {
    /// Metadata for a response that carried every matching ticket at once.
    pub fn single_page(items: usize) -> Self {
        Self {
            current_page: 1,
            per_page: items,
            total_items: items,
            total_pages: usize::from(items > 0),
            has_previous: false,
            has_next: false,
        }
    }
}

/// One page of tickets.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TicketPage {
    #[serde(rename = "bilhetes")]
    pub tickets: Vec<Ticket>,
    #[serde(rename = "paginacao")]
    pub page_info: PageInfo,
}

impl TicketPage {
    pub fn from_all(tickets: Vec<Ticket>) -> Self {
        let page_info = PageInfo::single_page(tickets.len());
        Self { tickets, page_info }
    }
}
