//! Conversion from transit DTOs to domain departures.

use chrono::NaiveDateTime;

use crate::domain::{Departure, Mode, ModeTable, Route, TimeError, normalize_time};

use super::types::{StopDeparture, TrainDeparture};

/// Convert a bus/tram record, classifying its mode from the line label.
pub fn convert_stop_departure(
    record: &StopDeparture,
    modes: &ModeTable,
    now: NaiveDateTime,
) -> Result<Departure, TimeError> {
    Ok(Departure {
        mode: modes.classify(&record.line),
        route: Route::Line(record.line.clone()),
        destination: record.destination.clone(),
        departure_time: normalize_time(&record.departure_time, now)?,
    })
}

/// Convert a rail record. Always a train.
pub fn convert_train_departure(
    record: &TrainDeparture,
    now: NaiveDateTime,
) -> Result<Departure, TimeError> {
    Ok(Departure {
        mode: Mode::Train,
        route: Route::Train(record.train_number.clone()),
        destination: record.destination.clone(),
        departure_time: normalize_time(&record.departure_time, now)?,
    })
}
