//! Ticket entity as returned by the ticket API.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::types::TicketId;

/// Offset used to display timestamps (Brasília, no daylight saving).
const BRT_OFFSET_SECS: i32 = -3 * 3600;

/// Lifecycle state of a ticket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Gerado,
    Premiado,
    Pago,
    Cancelado,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 4] = [
        TicketStatus::Gerado,
        TicketStatus::Premiado,
        TicketStatus::Pago,
        TicketStatus::Cancelado,
    ];

    /// Code used on the wire and in query strings.
    pub fn code(self) -> &'static str {
        match self {
            TicketStatus::Gerado => "GERADO",
            TicketStatus::Premiado => "PREMIADO",
            TicketStatus::Pago => "PAGO",
            TicketStatus::Cancelado => "CANCELADO",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            TicketStatus::Gerado => "Gerado",
            TicketStatus::Premiado => "Premiado",
            TicketStatus::Pago => "Pago",
            TicketStatus::Cancelado => "Cancelado",
        }
    }

    /// Bootstrap contextual colour for badges.
    pub fn badge_class(self) -> &'static str {
        match self {
            TicketStatus::Gerado => "primary",
            TicketStatus::Premiado => "success",
            TicketStatus::Pago => "info",
            TicketStatus::Cancelado => "secondary",
        }
    }
}

impl Display for TicketStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TicketStatus {
    type Err = String;

    /// Accepts either the wire code or the label, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        TicketStatus::ALL
            .into_iter()
            .find(|status| {
                status.code().eq_ignore_ascii_case(needle)
                    || status.label().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| format!("unknown ticket status: {needle}"))
    }
}

/// A single promotional ticket.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    #[serde(rename = "numeroSequencial")]
    pub sequence_number: String,
    #[serde(rename = "codigoUnico")]
    pub code: String,
    pub status: TicketStatus,
    #[serde(
        rename = "valor",
        default,
        deserialize_with = "deserialize_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub prize_amount: Option<f64>,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(rename = "dataResgate", default, skip_serializing_if = "Option::is_none")]
    pub redeemed_at: Option<String>,
    #[serde(rename = "nomeCompleto", default, skip_serializing_if = "Option::is_none")]
    pub holder_name: Option<String>,
    #[serde(rename = "telefone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "chavePix", default, skip_serializing_if = "Option::is_none")]
    pub pix_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code_ref: Option<String>,
}

impl Ticket {
    /// Whether payout contact details were already submitted.
    pub fn is_redeemed(&self) -> bool {
        self.redeemed_at.is_some()
    }

    /// Whether an administrator may mark the ticket as paid.
    pub fn can_mark_paid(&self) -> bool {
        self.status == TicketStatus::Premiado
    }
}

/// Prize values arrive either as JSON numbers or as decimal strings.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    match Option::<Amount>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Amount::Number(value)) => Ok(Some(value)),
        Some(Amount::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Amount::Text(text)) => {
            let amount = parse_amount(&text);
            if amount.is_none() {
                log::warn!("Ignoring unreadable ticket amount: {text}");
            }
            Ok(amount)
        }
    }
}

/// Parses `100`, `100.5`, `100,50`, `R$ 1.234,56` and similar inputs.
pub fn parse_amount(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Formats an amount as Brazilian reais, e.g. `R$ 1.234,56`.
pub fn format_brl(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let integer = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}R$ {grouped},{fraction:02}")
}

/// Parses the timestamp formats the API emits.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    let brt = FixedOffset::east_opt(BRT_OFFSET_SECS)?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&brt).naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Formats a timestamp as `dd/mm/aaaa HH:MM`. Unparsable input is returned
/// unchanged.
pub fn format_date_br(value: &str) -> String {
    match parse_timestamp(value) {
        Some(dt) => dt.format("%d/%m/%Y %H:%M").to_string(),
        None => value.to_string(),
    }
}
