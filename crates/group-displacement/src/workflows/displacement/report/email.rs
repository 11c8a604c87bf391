use super::super::analyzer::AnalysisResult;
use super::super::summary::SummaryMetrics;
use super::format_amount;
use chrono::{Duration, NaiveDate};
use serde::Serialize;

const DATE_FORMAT: &str = "%d/%m/%Y";

/// Sign-off request sent to the revenue manager when the gross total is over threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationEmail {
    pub subject: String,
    pub body: String,
}

impl AuthorizationEmail {
    /// `None` when the run stays within the authorization threshold or has no nights.
    pub fn for_result(
        group_name: &str,
        result: &AnalysisResult,
        summary: &SummaryMetrics,
        requester: &str,
    ) -> Option<Self> {
        if !summary.needs_authorization {
            return None;
        }

        let arrival = result.rows().first()?.date();
        let last_night = result.rows().last()?.date();
        let peak_rooms = result
            .rows()
            .iter()
            .map(|row| row.requested_rooms)
            .fold(0.0_f64, f64::max);

        Some(Self::compose(EmailDetails {
            group_name,
            arrival,
            departure: last_night + Duration::days(1),
            rooms: peak_rooms,
            gross_adr: summary.mean_group_gross_adr,
            total_gross: summary.total_gross,
            threshold: summary.authorization_threshold,
            requester,
        }))
    }

    fn compose(details: EmailDetails<'_>) -> Self {
        let total = format_amount(details.total_gross);
        let subject = format!(
            "Authorization request: group {} - value {}",
            details.group_name, total
        );
        let body = format!(
            "Dear Revenue Manager,\n\n\
             I am requesting authorization for the offer to group \"{group}\", \
             which exceeds the {threshold} threshold.\n\n\
             Request details:\n\
             - Stay: from {arrival} to {departure}\n\
             - Rooms: {rooms} ROH\n\
             - ADR: {adr}\n\
             - Total value: {total}\n\n\
             Displacement analysis attached.\n\n\
             Looking forward to your reply.\n\n\
             Kind regards,\n\
             {requester}\n",
            group = details.group_name,
            threshold = format_amount(details.threshold),
            arrival = details.arrival.format(DATE_FORMAT),
            departure = details.departure.format(DATE_FORMAT),
            rooms = details.rooms,
            adr = format_amount(details.gross_adr),
            total = total,
            requester = details.requester,
        );

        Self { subject, body }
    }

    pub fn render(&self) -> String {
        format!("Subject: {}\n\n{}", self.subject, self.body)
    }
}

struct EmailDetails<'a> {
    group_name: &'a str,
    arrival: NaiveDate,
    departure: NaiveDate,
    rooms: f64,
    gross_adr: f64,
    total_gross: f64,
    threshold: f64,
    requester: &'a str,
}
