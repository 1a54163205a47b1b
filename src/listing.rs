//! State of the administrative ticket listing.
//!
//! The listing keeps the active filters, the requested page and the outcome of
//! the last fetch. Every fetch is tagged with a generation number; a result is
//! only applied when it belongs to the latest fetch started on that state.
//!
//! Each HTTP request rebuilds its own state from the session snapshot, so
//! requests never share one. Across requests the listing page script numbers
//! its searches (`seq`, echoed by `/admin/api/bilhetes`) and drops answers to
//! superseded ones; full-page navigations simply replace the document.

use serde::{Deserialize, Serialize};

use crate::domain::filters::{DEFAULT_PAGE, TicketFilters};
use crate::domain::page::TicketPage;
use crate::domain::ticket::TicketStatus;

/// Page sizes offered in the listing toolbar.
pub const PAGE_SIZE_CHOICES: [usize; 4] = [10, 25, 50, 100];
/// Largest page size forwarded to the API.
pub const MAX_PAGE_SIZE: usize = 100;

/// Listing settings that survive between requests (kept in the session).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingSnapshot {
    pub filters: TicketFilters,
    pub page_size: Option<usize>,
    pub generation: u64,
}

/// Handle returned by [`ListingState::begin_fetch`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: Vec<(&'static str, String)>,
}

/// Whether a completion was applied or discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

#[derive(Clone, Debug, PartialEq)]
enum LoadOutcome {
    Loaded(TicketPage),
    Failed(String),
}

/// What the listing should display.
#[derive(Debug, PartialEq)]
pub enum ListingView<'a> {
    Loading,
    Empty,
    Error(&'a str),
    Populated(&'a TicketPage),
}

/// Count of one status on the displayed page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: TicketStatus,
    pub label: &'static str,
    pub badge: &'static str,
    pub count: usize,
    pub percent: usize,
}

/// Status breakdown of the displayed page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatusStats {
    pub total: usize,
    pub counts: Vec<StatusCount>,
}

impl StatusStats {
    pub fn from_page(page: &TicketPage) -> Self {
        let total = page.tickets.len();
        let counts = TicketStatus::ALL
            .into_iter()
            .map(|status| {
                let count = page.tickets.iter().filter(|t| t.status == status).count();
                StatusCount {
                    status,
                    label: status.label(),
                    badge: status.badge_class(),
                    count,
                    percent: ((count * 100) as f64 / total.max(1) as f64).round() as usize,
                }
            })
            .collect();
        Self { total, counts }
    }
}

#[derive(Clone, Debug)]
pub struct ListingState {
    filters: TicketFilters,
    page: usize,
    page_size: usize,
    default_page_size: usize,
    generation: u64,
    in_flight: bool,
    outcome: Option<LoadOutcome>,
}

impl ListingState {
    pub fn new(default_page_size: usize) -> Self {
        let default_page_size = default_page_size.clamp(1, MAX_PAGE_SIZE);
        Self {
            filters: TicketFilters::default(),
            page: DEFAULT_PAGE,
            page_size: default_page_size,
            default_page_size,
            generation: 0,
            in_flight: false,
            outcome: None,
        }
    }

    /// Rebuilds the state from a session snapshot. The page is not restored.
    pub fn restore(snapshot: ListingSnapshot, default_page_size: usize) -> Self {
        let mut state = Self::new(default_page_size);
        state.filters = snapshot.filters.normalized();
        state.page_size = snapshot
            .page_size
            .map_or(state.default_page_size, |size| size.clamp(1, MAX_PAGE_SIZE));
        state.generation = snapshot.generation;
        state
    }

    pub fn snapshot(&self) -> ListingSnapshot {
        ListingSnapshot {
            filters: self.filters.clone(),
            page_size: (self.page_size != self.default_page_size).then_some(self.page_size),
            generation: self.generation,
        }
    }

    pub fn filters(&self) -> &TicketFilters {
        &self.filters
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    /// Applies a navigation request.
    ///
    /// Changing filters or page size always lands on page 1. Otherwise the
    /// requested page is used, defaulting to 1.
    pub fn navigate(
        &mut self,
        filters: TicketFilters,
        page_size: Option<usize>,
        page: Option<usize>,
    ) {
        let filters = filters.normalized();
        let page_size = page_size
            .filter(|size| *size > 0)
            .map_or(self.page_size, |size| size.min(MAX_PAGE_SIZE));

        if filters != self.filters || page_size != self.page_size {
            self.filters = filters;
            self.page_size = page_size;
            self.page = DEFAULT_PAGE;
        } else {
            self.page = page.unwrap_or(DEFAULT_PAGE).max(DEFAULT_PAGE);
        }
    }

    pub fn clear_filters(&mut self) {
        self.filters = TicketFilters::default();
        self.page = DEFAULT_PAGE;
    }

    /// Starts a new fetch, superseding any fetch still in flight.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.in_flight = true;
        FetchTicket {
            generation: self.generation,
            query: self
                .filters
                .to_query_pairs(self.page, self.page_size, self.default_page_size),
        }
    }

    /// Records the result of a fetch unless a newer one has been started.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: Result<TicketPage, String>,
    ) -> Completion {
        if ticket.generation != self.generation {
            return Completion::Stale;
        }
        self.in_flight = false;
        self.outcome = Some(match result {
            Ok(page) => {
                self.page = page.page_info.current_page.max(DEFAULT_PAGE);
                LoadOutcome::Loaded(page)
            }
            Err(message) => LoadOutcome::Failed(message),
        });
        Completion::Applied
    }

    pub fn view(&self) -> ListingView<'_> {
        if self.in_flight {
            return ListingView::Loading;
        }
        match &self.outcome {
            None => ListingView::Loading,
            Some(LoadOutcome::Failed(message)) => ListingView::Error(message),
            Some(LoadOutcome::Loaded(page)) if page.tickets.is_empty() => ListingView::Empty,
            Some(LoadOutcome::Loaded(page)) => ListingView::Populated(page),
        }
    }

    /// Status breakdown of the last loaded page.
    pub fn stats(&self) -> Option<StatusStats> {
        match &self.outcome {
            Some(LoadOutcome::Loaded(page)) => Some(StatusStats::from_page(page)),
            _ => None,
        }
    }

    /// Takes the last loaded page out of the state.
    pub fn into_page(self) -> Option<TicketPage> {
        match self.outcome {
            Some(LoadOutcome::Loaded(page)) => Some(page),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::page::PageInfo;
    use crate::domain::ticket::Ticket;
    use crate::domain::types::TicketId;

    fn ticket(id: &str, status: TicketStatus) -> Ticket {
        Ticket {
            id: TicketId::new(id).unwrap(),
            sequence_number: format!("GANHADOR {id}"),
            code: "A1B2C3D4E5F".to_string(),
            status,
            prize_amount: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: None,
            redeemed_at: None,
            holder_name: None,
            phone: None,
            email: None,
            pix_key: None,
            pdf_url: None,
            qr_code_ref: None,
        }
    }

    fn page(current: usize, tickets: Vec<Ticket>) -> TicketPage {
        TicketPage {
            page_info: PageInfo {
                current_page: current,
                per_page: 10,
                total_items: 30,
                total_pages: 3,
                has_previous: current > 1,
                has_next: current < 3,
            },
            tickets,
        }
    }

    fn premiado() -> TicketFilters {
        TicketFilters {
            status: Some(TicketStatus::Premiado),
            ..Default::default()
        }
    }

    #[test]
    fn filter_change_resets_to_first_page() {
        let mut state = ListingState::new(10);
        state.navigate(TicketFilters::default(), None, Some(3));
        assert_eq!(state.page(), 3);

        state.navigate(premiado(), None, Some(3));
        assert_eq!(state.page(), 1);
        let fetch = state.begin_fetch();
        assert_eq!(fetch.query, vec![("status", "PREMIADO".to_string())]);
    }

    #[test]
    fn page_size_change_resets_to_first_page() {
        let mut state = ListingState::new(10);
        state.navigate(TicketFilters::default(), None, Some(2));
        state.navigate(TicketFilters::default(), Some(25), Some(2));
        assert_eq!(state.page(), 1);
        assert_eq!(state.page_size(), 25);
    }

    #[test]
    fn clearing_filters_requests_without_parameters() {
        let mut state = ListingState::new(10);
        state.navigate(premiado(), None, None);
        state.navigate(premiado(), None, Some(2));
        state.clear_filters();
        assert_eq!(state.page(), 1);
        assert!(state.begin_fetch().query.is_empty());
    }

    #[test]
    fn stale_completion_is_dropped() {
        let mut state = ListingState::new(10);
        let first = state.begin_fetch();
        state.navigate(premiado(), None, None);
        let second = state.begin_fetch();

        assert_eq!(
            state.complete(&second, Ok(page(1, vec![ticket("b2", TicketStatus::Premiado)]))),
            Completion::Applied
        );
        assert_eq!(
            state.complete(&first, Ok(page(1, vec![ticket("b1", TicketStatus::Gerado)]))),
            Completion::Stale
        );

        match state.view() {
            ListingView::Populated(page) => assert_eq!(page.tickets[0].id.as_str(), "b2"),
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn views_follow_last_outcome() {
        let mut state = ListingState::new(10);
        assert_eq!(state.view(), ListingView::Loading);

        let fetch = state.begin_fetch();
        assert!(state.is_loading());
        state.complete(&fetch, Err("Erro HTTP 500".to_string()));
        assert_eq!(state.view(), ListingView::Error("Erro HTTP 500"));

        let fetch = state.begin_fetch();
        state.complete(&fetch, Ok(page(1, vec![])));
        assert_eq!(state.view(), ListingView::Empty);
        assert!(!state.is_loading());
    }

    #[test]
    fn snapshot_round_trips_filters_and_size() {
        let mut state = ListingState::new(10);
        state.navigate(premiado(), Some(50), None);
        state.begin_fetch();

        let restored = ListingState::restore(state.snapshot(), 10);
        assert_eq!(restored.filters(), &premiado().normalized());
        assert_eq!(restored.page_size(), 50);
        assert_eq!(restored.generation(), 1);
        assert_eq!(restored.page(), 1);
    }

    #[test]
    fn stats_count_statuses_on_page() {
        let mut state = ListingState::new(10);
        let fetch = state.begin_fetch();
        state.complete(
            &fetch,
            Ok(page(
                1,
                vec![
                    ticket("a", TicketStatus::Premiado),
                    ticket("b", TicketStatus::Gerado),
                    ticket("c", TicketStatus::Gerado),
                ],
            )),
        );
        let stats = state.stats().unwrap();
        assert_eq!(stats.total, 3);
        let gerado = &stats.counts[0];
        assert_eq!((gerado.count, gerado.percent), (2, 67));
        let pago = &stats.counts[2];
        assert_eq!((pago.count, pago.percent), (0, 0));
    }
}
