use std::io::{Read, Seek};

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::filters::TicketFilters;
use crate::domain::redemption::MarkPaidRequest;
use crate::domain::ticket::{TicketStatus, parse_amount};
use crate::domain::types::TicketId;
use crate::dto::tickets::ImportReport;
use crate::forms::FormError;
use crate::listing::ListingState;

/// Columns every import file must carry.
pub const IMPORT_HEADERS: [&str; 4] = ["Número", "Código", "Status", "Valor"];

fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    value.and_then(|v| NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").ok())
}

#[derive(Debug, Default, Deserialize)]
/// Query string of the ticket listing. Empty inputs mean "unset".
pub struct TicketsQuery {
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub code: Option<String>,
    pub prefix: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    /// Present when the "clear filters" button was used.
    pub clear: Option<String>,
    /// Sequence number echoed by the JSON endpoint.
    pub seq: Option<u64>,
}

impl TicketsQuery {
    /// Filters described by the query. Unknown statuses and malformed dates
    /// are ignored.
    pub fn filters(&self) -> TicketFilters {
        TicketFilters {
            status: self
                .status
                .as_deref()
                .and_then(|s| s.parse::<TicketStatus>().ok()),
            start_date: parse_date(self.start_date.as_deref()),
            end_date: parse_date(self.end_date.as_deref()),
            code: self.code.clone(),
            prefix: self.prefix.clone(),
        }
        .normalized()
    }

    pub fn is_clear(&self) -> bool {
        self.clear.is_some()
    }

    /// Whether the request came from the filter form or a page link. Both
    /// always send `page_size`; a bare redirect back to the listing sends
    /// nothing and must keep the filters saved in the session.
    pub fn carries_filters(&self) -> bool {
        self.page_size.is_some()
            || [
                &self.status,
                &self.start_date,
                &self.end_date,
                &self.code,
                &self.prefix,
            ]
            .iter()
            .any(|value| value.is_some())
    }

    /// Applies the navigation this query asks for to a restored listing.
    pub fn apply_to(&self, state: &mut ListingState) {
        if self.is_clear() {
            state.clear_filters();
        } else if self.carries_filters() {
            state.navigate(self.filters(), self.page_size, self.page);
        } else {
            let filters = state.filters().clone();
            state.navigate(filters, None, self.page);
        }
    }
}

#[derive(Deserialize)]
/// Form posted by the "mark as paid" button.
pub struct MarkPaidForm {
    pub ticket_id: String,
}

impl TryFrom<MarkPaidForm> for MarkPaidRequest {
    type Error = FormError;

    fn try_from(form: MarkPaidForm) -> Result<Self, Self::Error> {
        let ticket_id = TicketId::new(form.ticket_id).map_err(|_| FormError::InvalidTicketId)?;
        Ok(MarkPaidRequest { ticket_id })
    }
}

/// One accepted row of an import file.
#[derive(Clone, Debug, PartialEq)]
pub struct ImportedTicket {
    pub number: String,
    pub code: String,
    pub status: Option<TicketStatus>,
    pub value: Option<f64>,
}

/// Parsed import file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImportPreview {
    pub rows: Vec<ImportedTicket>,
    pub report: ImportReport,
}

/// Parses an import file with the `Número, Código, Status, Valor` columns.
///
/// Rows without number or code are counted as failures. An unknown status or
/// an unreadable value only raises a warning.
pub fn parse_import_csv<R: Read>(reader: R) -> Result<ImportPreview, FormError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| FormError::Csv(e.to_string()))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut columns = [0usize; 4];
    for (slot, expected) in columns.iter_mut().zip(IMPORT_HEADERS) {
        *slot = headers
            .iter()
            .position(|h| h == expected)
            .ok_or(FormError::InvalidHeaders)?;
    }
    let [number_col, code_col, status_col, value_col] = columns;

    let mut preview = ImportPreview::default();
    // Blank lines are skipped by the reader, so numbering comes from the
    // record position rather than the record count.
    let mut line = 1;
    for record in rdr.records() {
        let record = match record {
            Ok(record) => {
                line = record.position().map_or(line + 1, |pos| pos.line());
                record
            }
            Err(err) => {
                line = err.position().map_or(line + 1, |pos| pos.line());
                preview.report.failed += 1;
                preview.report.errors.push(format!("Linha {line}: {err}"));
                continue;
            }
        };

        let field = |col: usize| record.get(col).filter(|v| !v.is_empty());

        let (Some(number), Some(code)) = (field(number_col), field(code_col)) else {
            preview.report.failed += 1;
            preview
                .report
                .errors
                .push(format!("Linha {line}: Número e Código são obrigatórios"));
            continue;
        };

        let status = field(status_col).and_then(|raw| match raw.parse::<TicketStatus>() {
            Ok(status) => Some(status),
            Err(_) => {
                preview
                    .report
                    .warnings
                    .push(format!("Status inválido na linha {line}: {raw}"));
                None
            }
        });

        let value = field(value_col).and_then(|raw| match parse_amount(raw) {
            Some(value) => Some(value),
            None => {
                preview
                    .report
                    .warnings
                    .push(format!("Valor inválido na linha {line}: {raw}"));
                None
            }
        });

        preview.rows.push(ImportedTicket {
            number: number.to_string(),
            code: code.to_uppercase(),
            status,
            value,
        });
        preview.report.imported += 1;
    }

    Ok(preview)
}

#[derive(MultipartForm)]
/// CSV upload for the import preview.
pub struct UploadTicketsForm {
    #[multipart(limit = "10MB")]
    pub csv: TempFile,
}

impl UploadTicketsForm {
    /// Accepts files named `*.csv` or sent as `text/csv`.
    pub fn is_csv(&self) -> bool {
        let by_name = self
            .csv
            .file_name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().ends_with(".csv"));
        let by_type = self
            .csv
            .content_type
            .as_ref()
            .is_some_and(|mime| mime.essence_str() == "text/csv");
        by_name || by_type
    }

    pub fn parse(&mut self) -> Result<ImportPreview, FormError> {
        if !self.is_csv() {
            return Err(FormError::NotCsv);
        }
        let file = self.csv.file.as_file_mut();
        file.rewind().map_err(|e| FormError::Csv(e.to_string()))?;
        parse_import_csv(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_builds_normalized_filters() {
        let query = TicketsQuery {
            status: Some("premiado".to_string()),
            start_date: Some("2024-03-01".to_string()),
            end_date: Some("2024-01-01".to_string()),
            code: Some(" ".to_string()),
            prefix: Some("promo".to_string()),
            ..Default::default()
        };
        let filters = query.filters();
        assert_eq!(filters.status, Some(TicketStatus::Premiado));
        assert_eq!(filters.start_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(filters.end_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(filters.code, None);
        assert_eq!(filters.prefix.as_deref(), Some("PROMO"));
    }

    #[test]
    fn unknown_status_and_bad_dates_are_ignored() {
        let query = TicketsQuery {
            status: Some("ativo".to_string()),
            start_date: Some("01/02/2024".to_string()),
            ..Default::default()
        };
        assert!(query.filters().is_empty());
    }

    fn saved_listing() -> ListingState {
        let mut state = ListingState::new(10);
        let query = TicketsQuery {
            status: Some("PREMIADO".to_string()),
            page_size: Some(25),
            ..Default::default()
        };
        query.apply_to(&mut state);
        ListingState::restore(state.snapshot(), 10)
    }

    #[test]
    fn bare_request_keeps_saved_filters() {
        let mut state = saved_listing();
        TicketsQuery::default().apply_to(&mut state);

        assert_eq!(state.filters().status, Some(TicketStatus::Premiado));
        assert_eq!(state.page_size(), 25);
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn bare_request_may_still_pick_a_page() {
        let mut state = saved_listing();
        let query = TicketsQuery {
            page: Some(3),
            ..Default::default()
        };
        query.apply_to(&mut state);

        assert_eq!(state.filters().status, Some(TicketStatus::Premiado));
        assert_eq!(state.page(), 3);
    }

    #[test]
    fn submitted_form_replaces_saved_filters() {
        let mut state = saved_listing();
        let query = TicketsQuery {
            page_size: Some(25),
            ..Default::default()
        };
        assert!(query.carries_filters());
        query.apply_to(&mut state);

        assert!(state.filters().is_empty());
    }

    #[test]
    fn clear_drops_saved_filters() {
        let mut state = saved_listing();
        let query = TicketsQuery {
            clear: Some("1".to_string()),
            ..Default::default()
        };
        query.apply_to(&mut state);

        assert!(state.filters().is_empty());
        assert_eq!(state.page_size(), 25);
    }

    #[test]
    fn import_counts_successes_failures_and_warnings() {
        let csv = "\u{feff}Número,Código,Status,Valor\n\
                   1,A1B2C3D4E5F,Premiado,\"100,00\"\n\
                   2,,Gerado,\n\
                   3,B1B2C3D4E5F,Ativo,abc\n\
                   \n\
                   4,C1B2C3D4E5F,,\n";
        let preview = parse_import_csv(csv.as_bytes()).unwrap();

        assert_eq!(preview.report.imported, 3);
        assert_eq!(preview.report.failed, 1);
        assert_eq!(preview.report.warnings.len(), 2);
        assert_eq!(preview.rows[0].status, Some(TicketStatus::Premiado));
        assert_eq!(preview.rows[0].value, Some(100.0));
        assert_eq!(preview.rows[1].status, None);
        assert!(preview.report.errors[0].starts_with("Linha 3"));
    }

    #[test]
    fn import_lines_count_blank_lines() {
        let csv = "Número,Código,Status,Valor\n\
                   1,A1B2C3D4E5F,Gerado,10\n\
                   \n\
                   2,,Gerado,\n\
                   3,B1B2C3D4E5F,Ativo,\n";
        let preview = parse_import_csv(csv.as_bytes()).unwrap();

        assert_eq!(
            preview.report.errors,
            vec!["Linha 4: Número e Código são obrigatórios".to_string()]
        );
        assert_eq!(
            preview.report.warnings,
            vec!["Status inválido na linha 5: Ativo".to_string()]
        );
    }

    #[test]
    fn import_rejects_missing_headers() {
        let err = parse_import_csv("Numero,Codigo\n1,ABC\n".as_bytes()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cabeçalhos inválidos. Esperado: Número, Código, Status, Valor"
        );
    }

    #[test]
    fn headers_may_come_in_any_order() {
        let csv = "Valor,Status,Código,Número\n50,Pago,a1b2c3d4e5f,7\n";
        let preview = parse_import_csv(csv.as_bytes()).unwrap();
        assert_eq!(
            preview.rows,
            vec![ImportedTicket {
                number: "7".to_string(),
                code: "A1B2C3D4E5F".to_string(),
                status: Some(TicketStatus::Pago),
                value: Some(50.0),
            }]
        );
    }

    fn upload(name: &str, content: &str) -> UploadTicketsForm {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        UploadTicketsForm {
            csv: TempFile {
                file,
                content_type: None,
                file_name: Some(name.to_string()),
                size: content.len(),
            },
        }
    }

    #[test]
    fn uploaded_file_is_rewound_before_parsing() {
        let mut form = upload("Bilhetes.CSV", "Número,Código,Status,Valor\n1,ABC,Gerado,10\n");
        let preview = form.parse().unwrap();
        assert_eq!(preview.report.imported, 1);
    }

    #[test]
    fn non_csv_upload_is_rejected() {
        let mut form = upload("bilhetes.xlsx", "Número,Código,Status,Valor\n");
        assert!(matches!(form.parse(), Err(FormError::NotCsv)));
    }

    #[test]
    fn mark_paid_requires_valid_id() {
        let form = MarkPaidForm {
            ticket_id: "../x".to_string(),
        };
        assert!(matches!(
            MarkPaidRequest::try_from(form),
            Err(FormError::InvalidTicketId)
        ));
    }
}
