//! Load daily price history from CSV or JSON chart exports
//!
//! Both formats need at least `date`, `open` and `close` per record; any other
//! columns (volume, change, vwap, ...) are ignored.

use super::price::{is_ascending, PricePoint};
use crate::error::{EsppError, Result};
use chrono::NaiveDate;
use csv::Reader;
use log::debug;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Raw feed record, shared by the CSV and JSON loaders
#[derive(Debug, Deserialize)]
struct FeedRow {
    date: String,
    open: f64,
    close: f64,
}

impl FeedRow {
    fn to_price_point(self) -> Result<PricePoint> {
        Ok(PricePoint {
            date: parse_date(&self.date)?,
            open: self.open,
            close: self.close,
        })
    }
}

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`)
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|source| EsppError::Date {
        value: value.to_string(),
        source,
    })
}

fn finish(prices: Vec<PricePoint>) -> Result<Vec<PricePoint>> {
    if !is_ascending(&prices) {
        return Err(EsppError::InvalidParameter(
            "price series must be strictly ascending by date".to_string(),
        ));
    }
    debug!("loaded {} trading days", prices.len());
    Ok(prices)
}

/// Load a price series from a CSV file with a header row
pub fn load_prices_csv<P: AsRef<Path>>(path: P) -> Result<Vec<PricePoint>> {
    let file = File::open(path)?;
    load_prices_csv_from_reader(file)
}

/// Load a price series from any CSV reader (e.g., string buffer, network stream)
pub fn load_prices_csv_from_reader<R: Read>(reader: R) -> Result<Vec<PricePoint>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut prices = Vec::new();

    for result in csv_reader.deserialize() {
        let row: FeedRow = result?;
        prices.push(row.to_price_point()?);
    }

    finish(prices)
}

/// Load a price series from a JSON file holding an array of chart records
pub fn load_prices_json<P: AsRef<Path>>(path: P) -> Result<Vec<PricePoint>> {
    let file = File::open(path)?;
    load_prices_json_from_reader(BufReader::new(file))
}

/// Load a JSON array of chart records from any reader
pub fn load_prices_json_from_reader<R: Read>(reader: R) -> Result<Vec<PricePoint>> {
    let rows: Vec<FeedRow> = serde_json::from_reader(reader)?;
    let prices = rows
        .into_iter()
        .map(FeedRow::to_price_point)
        .collect::<Result<Vec<_>>>()?;

    finish(prices)
}
