use serde::Serialize;

use crate::domain::filters::TicketFilters;
use crate::domain::page::PageInfo;
use crate::domain::pdf::StorageInfo;
use crate::domain::ticket::{Ticket, format_brl, format_date_br};
use crate::listing::StatusStats;
use crate::pagination::Paginated;

/// Ticket prepared for display: formatted dates, money and status badge.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct TicketRow {
    pub id: String,
    pub sequence_number: String,
    pub code: String,
    pub status: &'static str,
    pub status_label: &'static str,
    pub status_badge: &'static str,
    pub prize: Option<String>,
    pub created_at: String,
    pub redeemed_at: Option<String>,
    pub holder_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub pix_key: Option<String>,
    pub has_pdf: bool,
    pub can_mark_paid: bool,
}

impl From<&Ticket> for TicketRow {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id.to_string(),
            sequence_number: ticket.sequence_number.clone(),
            code: ticket.code.clone(),
            status: ticket.status.code(),
            status_label: ticket.status.label(),
            status_badge: ticket.status.badge_class(),
            prize: ticket.prize_amount.map(format_brl),
            created_at: format_date_br(&ticket.created_at),
            redeemed_at: ticket.redeemed_at.as_deref().map(format_date_br),
            holder_name: ticket.holder_name.clone(),
            phone: ticket.phone.clone(),
            email: ticket.email.clone(),
            pix_key: ticket.pix_key.clone(),
            has_pdf: ticket.pdf_url.is_some(),
            can_mark_paid: ticket.can_mark_paid(),
        }
    }
}

/// Filter values echoed back into the listing form.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct FilterValues {
    pub status: String,
    pub start_date: String,
    pub end_date: String,
    pub code: String,
    pub prefix: String,
}

impl From<&TicketFilters> for FilterValues {
    fn from(filters: &TicketFilters) -> Self {
        Self {
            status: filters.status.map(|s| s.code().to_string()).unwrap_or_default(),
            start_date: filters
                .start_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            end_date: filters
                .end_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            code: filters.code.clone().unwrap_or_default(),
            prefix: filters.prefix.clone().unwrap_or_default(),
        }
    }
}

/// Data required to render the ticket listing.
#[derive(Debug)]
pub struct TicketsPageData {
    /// Current page, absent when the fetch failed.
    pub tickets: Option<Paginated<TicketRow>>,
    pub stats: Option<StatusStats>,
    pub filters: FilterValues,
    pub has_filters: bool,
    pub page_size: usize,
    /// Message of a failed fetch, shown inline.
    pub error: Option<String>,
}

/// JSON answer of the scripted listing endpoint.
#[derive(Debug, Serialize)]
pub struct TicketsJson {
    /// Caller-supplied sequence number, echoed so stale answers can be dropped.
    pub seq: Option<u64>,
    pub tickets: Vec<TicketRow>,
    #[serde(rename = "paginacao")]
    pub page_info: PageInfo,
    pub stats: StatusStats,
}

/// Data required to render the admin dashboard.
pub struct DashboardData {
    pub storage: Option<StorageInfo>,
    pub storage_error: Option<String>,
    pub stats: Option<StatusStats>,
    pub recent: Vec<TicketRow>,
    pub total_tickets: usize,
}

/// Outcome of a CSV import preview.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub failed: usize,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

/// CSV export ready to be sent as an attachment.
pub struct CsvExport {
    pub file_name: String,
    pub content: Vec<u8>,
    pub rows: usize,
}
