use chrono::NaiveDate;

use crate::api::{ApiError, TicketApi};
use crate::domain::filters::{DEFAULT_PAGE, TicketFilters};
use crate::domain::page::{PageInfo, TicketPage};
use crate::domain::pdf::{PdfDocument, PdfLink};
use crate::domain::redemption::{MarkPaidRequest, PaymentReceipt};
use crate::domain::ticket::{Ticket, format_date_br};
use crate::domain::types::TicketId;
use crate::dto::tickets::{
    CsvExport, DashboardData, FilterValues, ImportReport, TicketRow, TicketsJson, TicketsPageData,
};
use crate::forms::tickets::{MarkPaidForm, UploadTicketsForm};
use crate::listing::{Completion, ListingState, ListingView, MAX_PAGE_SIZE, StatusStats};
use crate::pagination::Paginated;
use crate::services::{ServiceError, ServiceResult};

/// Safety stop for exports of very large result sets.
const MAX_EXPORT_PAGES: usize = 1_000;
/// Rows shown in the dashboard's "latest tickets" card.
const DASHBOARD_RECENT: usize = 5;
/// Header line of the CSV export.
pub const EXPORT_HEADER: [&str; 5] = ["ID", "Numero", "Codigo", "Status", "Criado em"];

fn rows(tickets: &[Ticket]) -> Vec<TicketRow> {
    tickets.iter().map(TicketRow::from).collect()
}

/// Runs one fetch for the current listing state and applies the result.
///
/// An expired session is returned as an error; any other failure is stored
/// in the state so the page can show it inline.
async fn fetch_into<A>(api: &A, state: &mut ListingState) -> ServiceResult<Completion>
where
    A: TicketApi + ?Sized,
{
    let fetch = state.begin_fetch();
    let result = match api.list_tickets(&fetch.query).await {
        Ok(page) => Ok(page),
        Err(err) if err.is_unauthorized() => return Err(ServiceError::SessionExpired),
        Err(err) => {
            log::error!("Failed to list tickets: {err}");
            Err(err.to_string())
        }
    };

    let completion = state.complete(&fetch, result);
    if completion == Completion::Stale {
        log::debug!("Dropped stale listing result #{}", fetch.generation);
    }
    Ok(completion)
}

/// Loads the ticket listing for the state's filters and page.
pub async fn load_tickets_page<A>(
    api: &A,
    state: &mut ListingState,
) -> ServiceResult<TicketsPageData>
where
    A: TicketApi + ?Sized,
{
    fetch_into(api, state).await?;

    let (tickets, error) = match state.view() {
        ListingView::Populated(page) => (
            Some(Paginated::new(rows(&page.tickets), &page.page_info)),
            None,
        ),
        ListingView::Empty => (
            Some(Paginated::new(Vec::new(), &PageInfo::single_page(0))),
            None,
        ),
        ListingView::Error(message) => (None, Some(message.to_string())),
        ListingView::Loading => (None, None),
    };

    Ok(TicketsPageData {
        tickets,
        stats: state.stats(),
        filters: FilterValues::from(state.filters()),
        has_filters: !state.filters().is_empty(),
        page_size: state.page_size(),
        error,
    })
}

/// Same listing as [`load_tickets_page`], shaped for scripted callers.
pub async fn list_tickets_json<A>(
    api: &A,
    state: &mut ListingState,
    seq: Option<u64>,
) -> ServiceResult<TicketsJson>
where
    A: TicketApi + ?Sized,
{
    let fetch = state.begin_fetch();
    let page = api.list_tickets(&fetch.query).await.map_err(|err| {
        log::error!("Failed to list tickets: {err}");
        ServiceError::from(err)
    })?;
    state.complete(&fetch, Ok(page.clone()));

    Ok(TicketsJson {
        seq,
        tickets: rows(&page.tickets),
        stats: StatusStats::from_page(&page),
        page_info: page.page_info,
    })
}

/// Fetches every page matching `filters` and renders them as CSV.
pub async fn export_tickets_csv<A>(
    api: &A,
    filters: &TicketFilters,
    default_page_size: usize,
    today: NaiveDate,
) -> ServiceResult<CsvExport>
where
    A: TicketApi + ?Sized,
{
    let mut tickets = Vec::new();
    let mut page = DEFAULT_PAGE;
    loop {
        let query = filters.to_query_pairs(page, MAX_PAGE_SIZE, default_page_size);
        let TicketPage {
            tickets: batch,
            page_info,
        } = api.list_tickets(&query).await.map_err(|err| {
            log::error!("Failed to export tickets (page {page}): {err}");
            ServiceError::from(err)
        })?;
        tickets.extend(batch);

        if !page_info.has_next || page >= page_info.total_pages || page >= MAX_EXPORT_PAGES {
            break;
        }
        page += 1;
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    let write_err = |err: csv::Error| {
        log::error!("Failed to write CSV export: {err}");
        ServiceError::Internal
    };
    writer.write_record(EXPORT_HEADER).map_err(write_err)?;
    for ticket in &tickets {
        writer
            .write_record([
                ticket.id.as_str(),
                ticket.sequence_number.as_str(),
                ticket.code.as_str(),
                ticket.status.code(),
                format_date_br(&ticket.created_at).as_str(),
            ])
            .map_err(write_err)?;
    }
    let content = writer.into_inner().map_err(|err| {
        log::error!("Failed to flush CSV export: {err}");
        ServiceError::Internal
    })?;

    log::info!("Exported {} tickets", tickets.len());
    Ok(CsvExport {
        file_name: format!("bilhetes_{}.csv", today.format("%Y-%m-%d")),
        content,
        rows: tickets.len(),
    })
}

/// Parses an uploaded CSV and reports what would be imported.
///
/// Rows are logged, not persisted: the API has no import endpoint.
pub fn preview_import(form: &mut UploadTicketsForm) -> ServiceResult<ImportReport> {
    let preview = form.parse().map_err(|err| {
        log::error!("Failed to parse import file: {err}");
        ServiceError::from(err)
    })?;

    for row in &preview.rows {
        log::info!("Import preview row: {row:?}");
    }
    for warning in &preview.report.warnings {
        log::warn!("{warning}");
    }
    log::info!(
        "Import preview: {} accepted, {} failed",
        preview.report.imported,
        preview.report.failed
    );
    Ok(preview.report)
}

/// Flash message summarizing an import preview.
pub fn import_message(report: &ImportReport) -> String {
    format!(
        "Importação concluída com sucesso! {} importados, {} com erro.",
        report.imported, report.failed
    )
}

/// Marks a redeemed ticket as paid.
pub async fn mark_ticket_paid<A>(api: &A, form: MarkPaidForm) -> ServiceResult<PaymentReceipt>
where
    A: TicketApi + ?Sized,
{
    let request = MarkPaidRequest::try_from(form)?;

    let receipt = api.mark_paid(&request).await.map_err(|err| {
        log::error!("Failed to mark ticket {} as paid: {err}", request.ticket_id);
        match err {
            ApiError::Status { status: 400, message, .. } => ServiceError::Form(message),
            other => ServiceError::from(other),
        }
    })?;

    if !receipt.success {
        return Err(ServiceError::Form(receipt.message));
    }
    log::info!("Ticket {} marked as paid", request.ticket_id);
    Ok(receipt)
}

/// Temporary link to the ticket's stored PDF.
pub async fn pdf_link<A>(api: &A, ticket_id: &str) -> ServiceResult<PdfLink>
where
    A: TicketApi + ?Sized,
{
    let id = TicketId::new(ticket_id)?;
    api.pdf_link(&id).await.map_err(|err| {
        log::error!("Failed to get PDF link for {id}: {err}");
        ServiceError::from(err)
    })
}

/// Downloads (generating if needed) the ticket's PDF.
pub async fn download_pdf<A>(api: &A, ticket_id: &str) -> ServiceResult<(String, PdfDocument)>
where
    A: TicketApi + ?Sized,
{
    let id = TicketId::new(ticket_id)?;
    let document = api.download_pdf(&id).await.map_err(|err| {
        log::error!("Failed to download PDF for {id}: {err}");
        ServiceError::from(err)
    })?;
    Ok((format!("bilhete_{id}.pdf"), document))
}

/// Deletes the ticket's stored PDF and returns the confirmation text.
pub async fn remove_pdf<A>(api: &A, ticket_id: &str) -> ServiceResult<String>
where
    A: TicketApi + ?Sized,
{
    let id = TicketId::new(ticket_id)?;
    let removal = api.remove_pdf(&id).await.map_err(|err| {
        log::error!("Failed to remove PDF for {id}: {err}");
        ServiceError::from(err)
    })?;
    log::info!("PDF of ticket {id} removed");
    Ok(removal
        .message
        .unwrap_or_else(|| "PDF removido com sucesso.".to_string()))
}

/// Storage status and a summary of the first listing page.
pub async fn load_dashboard<A>(api: &A, default_page_size: usize) -> ServiceResult<DashboardData>
where
    A: TicketApi + ?Sized,
{
    let (storage, storage_error) = match api.storage_info().await {
        Ok(info) => (Some(info), None),
        Err(err) if err.is_unauthorized() => return Err(ServiceError::SessionExpired),
        Err(err) => {
            log::warn!("Failed to get storage info: {err}");
            (None, Some(err.to_string()))
        }
    };

    let mut state = ListingState::new(default_page_size);
    fetch_into(api, &mut state).await?;
    let stats = state.stats();
    let (recent, total_tickets) = match state.into_page() {
        Some(page) => (
            rows(&page.tickets[..page.tickets.len().min(DASHBOARD_RECENT)]),
            page.page_info.total_items,
        ),
        None => (Vec::new(), 0),
    };

    Ok(DashboardData {
        storage,
        storage_error,
        stats,
        recent,
        total_tickets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pdf::{PdfRemoval, StorageInfo};
    use crate::domain::ticket::TicketStatus;
    use crate::services::fake::{FakeTicketApi, page, status_error, ticket};

    #[actix_web::test]
    async fn status_filter_issues_single_call_with_status_only() {
        let api = FakeTicketApi::new()
            .with_pages(vec![Ok(page(1, 1, vec![ticket("b1", TicketStatus::Premiado)]))]);
        let mut state = ListingState::new(10);
        state.navigate(
            TicketFilters {
                status: Some(TicketStatus::Premiado),
                ..Default::default()
            },
            None,
            None,
        );

        let data = load_tickets_page(&api, &mut state).await.unwrap();

        assert_eq!(api.call_count(), 1);
        assert_eq!(
            api.list_queries.borrow()[0],
            vec![("status", "PREMIADO".to_string())]
        );
        let tickets = data.tickets.unwrap();
        assert_eq!(tickets.items[0].status_label, "Premiado");
        assert_eq!(tickets.items[0].prize.as_deref(), Some("R$ 100,00"));
        assert!(data.has_filters);
    }

    #[actix_web::test]
    async fn clearing_filters_lists_without_parameters() {
        let api = FakeTicketApi::new();
        let mut state = ListingState::new(10);
        state.navigate(
            TicketFilters {
                prefix: Some("PROMO".to_string()),
                ..Default::default()
            },
            None,
            None,
        );
        state.clear_filters();

        let data = load_tickets_page(&api, &mut state).await.unwrap();

        assert!(api.list_queries.borrow()[0].is_empty());
        assert!(data.tickets.unwrap().items.is_empty());
        assert!(!data.has_filters);
    }

    #[actix_web::test]
    async fn list_failure_is_shown_inline() {
        let api = FakeTicketApi::new().with_pages(vec![Err(status_error(500, "Erro HTTP 500"))]);
        let mut state = ListingState::new(10);
        let data = load_tickets_page(&api, &mut state).await.unwrap();
        assert!(data.tickets.is_none());
        assert_eq!(data.error.as_deref(), Some("Erro HTTP 500"));
    }

    #[actix_web::test]
    async fn expired_token_ends_session() {
        let api = FakeTicketApi::new().with_pages(vec![Err(status_error(401, "Unauthorized"))]);
        let mut state = ListingState::new(10);
        let err = load_tickets_page(&api, &mut state).await.unwrap_err();
        assert!(matches!(err, ServiceError::SessionExpired));
    }

    #[actix_web::test]
    async fn json_listing_echoes_sequence() {
        let api = FakeTicketApi::new().with_pages(vec![Ok(page(
            1,
            1,
            vec![ticket("b1", TicketStatus::Gerado)],
        ))]);
        let mut state = ListingState::new(10);
        let json = list_tickets_json(&api, &mut state, Some(7)).await.unwrap();
        assert_eq!(json.seq, Some(7));
        assert_eq!(json.tickets.len(), 1);
        assert_eq!(json.stats.total, 1);
    }

    #[actix_web::test]
    async fn export_walks_every_page() {
        let api = FakeTicketApi::new().with_pages(vec![
            Ok(page(1, 2, vec![ticket("b1", TicketStatus::Gerado)])),
            Ok(page(2, 2, vec![ticket("b2", TicketStatus::Pago)])),
        ]);
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        let export = export_tickets_csv(&api, &TicketFilters::default(), 10, today)
            .await
            .unwrap();

        assert_eq!(export.file_name, "bilhetes_2024-05-01.csv");
        assert_eq!(export.rows, 2);
        let queries = api.list_queries.borrow();
        assert_eq!(queries[0], vec![("limite", "100".to_string())]);
        assert_eq!(
            queries[1],
            vec![("pagina", "2".to_string()), ("limite", "100".to_string())]
        );

        let text = String::from_utf8(export.content).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("ID,Numero,Codigo,Status,Criado em"));
        assert_eq!(
            lines.next(),
            Some("b1,GANHADOR b1,A1B2C3D4E5F,GERADO,15/01/2024 10:30")
        );
    }

    #[actix_web::test]
    async fn mark_paid_reports_business_errors() {
        let api = FakeTicketApi::new();
        *api.payment.borrow_mut() = Some(Err(status_error(
            400,
            "Este bilhete já está marcado como pago",
        )));
        let err = mark_ticket_paid(
            &api,
            MarkPaidForm {
                ticket_id: "b1".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Este bilhete já está marcado como pago");
    }

    #[actix_web::test]
    async fn mark_paid_succeeds() {
        let api = FakeTicketApi::new();
        *api.payment.borrow_mut() = Some(Ok(PaymentReceipt {
            success: true,
            message: "Bilhete marcado como pago com sucesso!".to_string(),
            ticket: Some(ticket("b1", TicketStatus::Pago)),
        }));
        let receipt = mark_ticket_paid(
            &api,
            MarkPaidForm {
                ticket_id: "b1".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(receipt.message, "Bilhete marcado como pago com sucesso!");
        assert_eq!(api.calls.borrow().as_slice(), ["marcar-como-pago b1"]);
    }

    #[actix_web::test]
    async fn pdf_operations_validate_id() {
        let api = FakeTicketApi::new();
        let err = download_pdf(&api, "../etc").await.unwrap_err();
        assert!(matches!(err, ServiceError::TypeConstraint(_)));
        assert_eq!(api.call_count(), 0);
    }

    #[actix_web::test]
    async fn pdf_download_names_file() {
        let api = FakeTicketApi::new();
        *api.pdf.borrow_mut() = Some(Ok(PdfDocument {
            content: b"%PDF-1.4".to_vec(),
        }));
        let (name, document) = download_pdf(&api, "b1").await.unwrap();
        assert_eq!(name, "bilhete_b1.pdf");
        assert_eq!(document.content, b"%PDF-1.4");
    }

    #[actix_web::test]
    async fn remove_pdf_defaults_message() {
        let api = FakeTicketApi::new();
        *api.removal.borrow_mut() = Some(Ok(PdfRemoval::default()));
        assert_eq!(
            remove_pdf(&api, "b1").await.unwrap(),
            "PDF removido com sucesso."
        );
    }

    #[actix_web::test]
    async fn dashboard_tolerates_storage_failure() {
        let api = FakeTicketApi::new().with_pages(vec![Ok(page(
            1,
            3,
            vec![
                ticket("b1", TicketStatus::Premiado),
                ticket("b2", TicketStatus::Gerado),
            ],
        ))]);

        let data = load_dashboard(&api, 10).await.unwrap();
        assert!(data.storage.is_none());
        assert_eq!(data.storage_error.as_deref(), Some("Erro de conexão"));
        assert_eq!(data.recent.len(), 2);
        assert_eq!(data.total_tickets, 6);
        assert_eq!(data.stats.unwrap().total, 2);
    }

    #[actix_web::test]
    async fn dashboard_shows_storage() {
        let api = FakeTicketApi::new();
        *api.storage.borrow_mut() = Some(Ok(StorageInfo {
            bucket_name: "bilhetes-pdf".to_string(),
            endpoint: "localhost".to_string(),
            connected: true,
        }));
        let data = load_dashboard(&api, 10).await.unwrap();
        assert!(data.storage.unwrap().connected);
        assert_eq!(data.total_tickets, 0);
    }
}
