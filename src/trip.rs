// Trip helpers: parsed stay dates and the nights that must be confirmed
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug, PartialEq)]
pub enum TripError {
    #[error("Invalid {field} date: {value}")]
    InvalidDate { field: &'static str, value: String },

    #[error("Departure {departure} must be after arrival {arrival}")]
    EmptyStay { arrival: String, departure: String },
}

// Derived values the enhancer works with
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripHelpers {
    pub arrival_date: NaiveDate,
    pub departure_date: NaiveDate,
    pub length_of_stay: u32,
    pub number_of_guests: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripInfo {
    pub arrival: String,
    pub departure: String,
    pub guest_ages: Vec<u32>,
    pub helpers: TripHelpers,
}

/// A single night of the stay, keyed by its ISO date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Night {
    pub date: NaiveDate,
    pub key: String,
    pub is_first: bool,
    pub is_last: bool,
}

impl TripInfo {
    pub fn new(arrival: &str, departure: &str, guest_ages: Vec<u32>) -> Result<Self, TripError> {
        let arrival_date = parse_date("arrival", arrival)?;
        let departure_date = parse_date("departure", departure)?;

        if departure_date <= arrival_date {
            return Err(TripError::EmptyStay {
                arrival: arrival.to_string(),
                departure: departure.to_string(),
            });
        }

        let length_of_stay = (departure_date - arrival_date).num_days() as u32;
        let number_of_guests = guest_ages.len() as u32;

        Ok(Self {
            arrival: arrival.to_string(),
            departure: departure.to_string(),
            guest_ages,
            helpers: TripHelpers {
                arrival_date,
                departure_date,
                length_of_stay,
                number_of_guests,
            },
        })
    }

    /// Nights from arrival up to, but excluding, departure.
    ///
    /// Empty when the helpers describe a stay with no nights, which
    /// `TripInfo::new` never produces.
    pub fn nights(&self) -> Vec<Night> {
        let first = self.helpers.arrival_date;
        let last = self.helpers.departure_date.pred_opt();

        first
            .iter_days()
            .take_while(|date| *date < self.helpers.departure_date)
            .map(|date| Night {
                date,
                key: format_date(date),
                is_first: date == first,
                is_last: Some(date) == last,
            })
            .collect()
    }

    pub fn departure_key(&self) -> String {
        format_date(self.helpers.departure_date)
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, TripError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| TripError::InvalidDate {
        field,
        value: value.to_string(),
    })
}
