//! `imgharvest series-url <name>` – series page URL for a name.

use imgharvest_core::series;

pub fn run_series_url(base_url: &str, name: &str) {
    println!("{}", series::series_url(base_url, name));
}
