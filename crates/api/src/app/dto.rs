use serde::Deserialize;

use tally_core::{DomainError, DomainResult, Violations};
use tally_ledger::{Currency, OpenAccount, TimeFrame};

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /api/v1/accounts`. Unknown fields (ids, balance, status…)
/// are ignored; the server owns them.
#[derive(Debug, Default, Deserialize)]
pub struct CreateAccountRequest {
    pub customer: Option<String>,
    pub currency: Option<String>,
    pub name: Option<String>,
}

impl CreateAccountRequest {
    /// A blank currency counts as missing and is reported by the ledger;
    /// an unrecognised code is rejected here.
    pub fn into_command(self) -> DomainResult<OpenAccount> {
        let currency = match self.currency.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(code) => Some(code.parse::<Currency>()?),
        };

        Ok(OpenAccount {
            customer: self.customer,
            currency,
            name: self.name,
        })
    }
}

/// Query string of the transactions endpoint, kept as raw text so missing
/// and malformed values get their own messages.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionsParams {
    #[serde(rename = "timeFrame")]
    pub time_frame: Option<String>,
    pub interval: Option<String>,
}

impl TransactionsParams {
    pub fn parse(&self) -> DomainResult<(TimeFrame, i64)> {
        let mut v = Violations::new();
        v.require_text("timeFrame", self.time_frame.as_deref(), "Time frame is mandatory");
        v.require_text("interval", self.interval.as_deref(), "Interval is mandatory");

        let frame = self
            .time_frame
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<TimeFrame>)
            .transpose();
        let interval = self
            .interval
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim().parse::<i64>())
            .transpose();

        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                for message in e.messages() {
                    v.push("timeFrame", message);
                }
                None
            }
        };
        let interval = match interval {
            Ok(interval) => interval,
            Err(_) => {
                v.push("interval", "Interval must be an integer");
                None
            }
        };

        v.finish()?;
        match (frame, interval) {
            (Some(frame), Some(interval)) => Ok((frame, interval)),
            _ => Err(DomainError::invalid_field("query", "Time frame and interval are required")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(time_frame: Option<&str>, interval: Option<&str>) -> TransactionsParams {
        TransactionsParams {
            time_frame: time_frame.map(String::from),
            interval: interval.map(String::from),
        }
    }

    #[test]
    fn parses_frame_and_interval() {
        assert_eq!(params(Some("DAYS"), Some("3")).parse().unwrap(), (TimeFrame::Days, 3));
        assert_eq!(params(Some("HOURS"), Some(" 1 ")).parse().unwrap(), (TimeFrame::Hours, 1));
    }

    #[test]
    fn missing_parameters_are_reported_together() {
        let err = params(None, None).parse().unwrap_err();
        assert_eq!(err.messages(), vec!["Time frame is mandatory", "Interval is mandatory"]);

        let err = params(Some("DAYS"), Some("")).parse().unwrap_err();
        assert_eq!(err.messages(), vec!["Interval is mandatory"]);
    }

    #[test]
    fn malformed_parameters_have_their_own_messages() {
        let err = params(Some("days"), Some("ten")).parse().unwrap_err();
        assert_eq!(
            err.messages(),
            vec!["Time frame must be one of HOURS, DAYS", "Interval must be an integer"]
        );
    }

    #[test]
    fn blank_currency_is_left_to_the_ledger() {
        let cmd = CreateAccountRequest {
            customer: Some("Cosmin".into()),
            currency: Some("  ".into()),
            name: Some("savings".into()),
        }
        .into_command()
        .unwrap();
        assert_eq!(cmd.currency, None);
    }

    #[test]
    fn unknown_currency_is_rejected() {
        let err = CreateAccountRequest {
            currency: Some("XYZ".into()),
            ..Default::default()
        }
        .into_command()
        .unwrap_err();
        assert_eq!(err.messages(), vec!["Currency must be one of EUR, USD, GBP, RON, CHF"]);
    }
}
