use crate::utils::{date_add_months, month_bounds};
use crate::{Date, Error};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which bucket bare tokens land in while walking a report command.
enum Phase {
    Select,
    Exclude,
    Period,
    PeriodStart,
    PeriodEnd,
    Title,
    /// A one-token phase has taken its token; anything further is an error.
    Done,
}

/// Parameters selecting the accounts, period, and title of a report.
///
/// `today` is captured at construction so that relative period expressions
/// and the "As of" subtitle resolve deterministically; report generation
/// stays a pure function of the journal and these parameters.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportParameters {
    pub title: String,
    pub accounts_with: Option<Vec<String>>,
    pub exclude_accounts_with: Option<Vec<String>>,
    pub period_start: Option<Date>,
    pub period_end: Option<Date>,
    pub today: Date,
}

impl ReportParameters {
    pub fn new(title: impl Into<String>, today: Date) -> Self {
        ReportParameters {
            title: title.into(),
            accounts_with: None,
            exclude_accounts_with: None,
            period_start: None,
            period_end: None,
            today,
        }
    }

    /// Parses the report-parameter mini-language.
    ///
    /// Whitespace-separated tokens; bare tokens before any directive are
    /// inclusion terms; `:excluding` switches to exclusion terms;
    /// `:period` collects a period expression (`this month`, `last month`);
    /// `:since` and `:upto` each take one explicit `YYYY/MM/DD` date;
    /// `:title` switches to title tokens. Anything else outside a
    /// collecting phase is an error, fatal to this report request only.
    pub fn from_command(command: &str, default_title: &str, today: Date) -> Result<Self, Error> {
        let mut phase = Phase::Select;
        let mut accounts_with = Vec::new();
        let mut exclude_accounts_with = Vec::new();
        let mut period = Vec::new();
        let mut title = Vec::new();
        let mut period_start = None;
        let mut period_end = None;

        for token in command.split_whitespace() {
            match token {
                ":excluding" => phase = Phase::Exclude,
                ":period" => phase = Phase::Period,
                ":since" => phase = Phase::PeriodStart,
                ":upto" => phase = Phase::PeriodEnd,
                ":title" => phase = Phase::Title,
                _ => match phase {
                    Phase::Select => accounts_with.push(token.to_string()),
                    Phase::Exclude => exclude_accounts_with.push(token.to_string()),
                    Phase::Period => period.push(token.to_string()),
                    Phase::PeriodStart => {
                        period_start = Some(parse_date(token)?);
                        phase = Phase::Done;
                    }
                    Phase::PeriodEnd => {
                        period_end = Some(parse_date(token)?);
                        phase = Phase::Done;
                    }
                    Phase::Title => title.push(token.to_string()),
                    Phase::Done => {
                        return Err(Error::query(format!(
                            "Invalid token in report command: {}.",
                            token
                        )))
                    }
                },
            }
        }

        if !period.is_empty() {
            let period_str = period.join(" ");
            let (start, end) = match period_str.as_str() {
                "this month" => month_bounds(today),
                "last month" => month_bounds(date_add_months(today, -1)),
                _ => {
                    return Err(Error::query(format!(
                        "Invalid period expression: {}.",
                        period_str
                    )))
                }
            };
            period_start = Some(start);
            period_end = Some(end);
        }

        Ok(ReportParameters {
            title: if title.is_empty() {
                default_title.to_string()
            } else {
                title.join(" ")
            },
            accounts_with: some_if_nonempty(accounts_with),
            exclude_accounts_with: some_if_nonempty(exclude_accounts_with),
            period_start,
            period_end,
            today,
        })
    }
}

fn some_if_nonempty(terms: Vec<String>) -> Option<Vec<String>> {
    if terms.is_empty() {
        None
    } else {
        Some(terms)
    }
}

fn parse_date(token: &str) -> Result<Date, Error> {
    Date::parse_from_str(token, "%Y/%m/%d")
        .map_err(|_| Error::query(format!("Invalid date: {}.", token)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorType;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> Date {
        date(2012, 4, 15)
    }

    #[test]
    fn bare_tokens_are_inclusion_terms() {
        let params =
            ReportParameters::from_command("assets liabilities", "Balance", today()).unwrap();
        assert_eq!(
            params.accounts_with,
            Some(vec!["assets".to_string(), "liabilities".to_string()])
        );
        assert_eq!(params.exclude_accounts_with, None);
        assert_eq!(params.title, "Balance");
    }

    #[test]
    fn excluding_switches_to_exclusion_terms() {
        let params =
            ReportParameters::from_command("income :excluding bonus", "Balance", today()).unwrap();
        assert_eq!(params.accounts_with, Some(vec!["income".to_string()]));
        assert_eq!(
            params.exclude_accounts_with,
            Some(vec!["bonus".to_string()])
        );
    }

    #[test]
    fn title_tokens_join_into_the_title() {
        let params =
            ReportParameters::from_command(":title Net Worth", "Balance", today()).unwrap();
        assert_eq!(params.title, "Net Worth");
    }

    #[test]
    fn since_and_upto_take_explicit_dates() {
        let params = ReportParameters::from_command(
            "assets :since 2012/01/01 :upto 2012/03/31",
            "Balance",
            today(),
        )
        .unwrap();
        assert_eq!(params.period_start, Some(date(2012, 1, 1)));
        assert_eq!(params.period_end, Some(date(2012, 3, 31)));
    }

    #[test]
    fn this_month_covers_the_whole_month() {
        let params =
            ReportParameters::from_command(":period this month", "Balance", today()).unwrap();
        assert_eq!(params.period_start, Some(date(2012, 4, 1)));
        assert_eq!(params.period_end, Some(date(2012, 4, 30)));
    }

    #[test]
    fn last_month_steps_back_one_month() {
        let params =
            ReportParameters::from_command(":period last month", "Balance", today()).unwrap();
        assert_eq!(params.period_start, Some(date(2012, 3, 1)));
        assert_eq!(params.period_end, Some(date(2012, 3, 31)));
    }

    #[test]
    fn unknown_period_expression_is_an_error() {
        let err = ReportParameters::from_command(":period next month", "Balance", today())
            .unwrap_err();
        assert_eq!(err.r#type, ErrorType::Query);
        assert!(err.msg.contains("next month"), "{}", err.msg);
    }

    #[test]
    fn extra_tokens_after_a_date_are_errors() {
        let err = ReportParameters::from_command(":since 2012/01/01 huh", "Balance", today())
            .unwrap_err();
        assert_eq!(err.r#type, ErrorType::Query);
        assert!(err.msg.contains("huh"), "{}", err.msg);
    }

    #[test]
    fn malformed_dates_are_errors() {
        let err =
            ReportParameters::from_command(":since 2012-01-01", "Balance", today()).unwrap_err();
        assert_eq!(err.r#type, ErrorType::Query);
    }
}
