//! Daily price series and feed loaders

mod price;
mod loader;

pub use price::{PricePoint, is_ascending};
pub use loader::{parse_date, load_prices_csv, load_prices_csv_from_reader, load_prices_json, load_prices_json_from_reader};
