use chrono::{Duration, TimeZone, Utc};
use common::Bar;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generate a random-walk OHLCV series for one instrument
///
/// The same `seed` always yields the same bars.
pub fn generate_synthetic_bars(days: usize, initial_price: f64, seed: u64) -> Vec<Bar> {
    let mut rng = StdRng::seed_from_u64(seed);
    random_walk(&mut rng, None, days, initial_price)
}

/// Generate several instruments over the same dates, rows interleaved by date
///
/// Each symbol gets its own random walk; rows come out as
/// `day0/sym0, day0/sym1, ..., day1/sym0, ...` so groups are scattered.
pub fn generate_multi_symbol_bars(
    symbols: &[&str],
    days: usize,
    initial_price: f64,
    seed: u64,
) -> Vec<Bar> {
    let per_symbol: Vec<Vec<Bar>> = symbols
        .iter()
        .enumerate()
        .map(|(k, symbol)| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(k as u64));
            let start_price = initial_price * (1.0 + k as f64 * 0.5);
            random_walk(&mut rng, Some(symbol), days, start_price)
        })
        .collect();

    let mut bars = Vec::with_capacity(days * symbols.len());
    for day in 0..days {
        for series in &per_symbol {
            bars.push(series[day].clone());
        }
    }
    bars
}

fn random_walk(rng: &mut StdRng, symbol: Option<&str>, days: usize, initial_price: f64) -> Vec<Bar> {
    let mut bars = Vec::with_capacity(days);

    let mut price = initial_price;
    let start_date = Utc
        .with_ymd_and_hms(2024, 1, 2, 0, 0, 0)
        .single()
        .unwrap_or_default();

    let daily_volatility = 0.02;
    let drift = 0.0002;

    for i in 0..days {
        let date = start_date + Duration::days(i as i64);

        let random_return: f64 = rng.gen_range(-1.0..1.0);
        let daily_return = drift + daily_volatility * random_return;
        let new_price = price * (1.0 + daily_return);

        // Generate OHLC
        let intraday_range = price * rng.gen_range(0.01..0.04);
        let open = price + rng.gen_range(-intraday_range / 2.0..intraday_range / 2.0);
        let close = new_price;

        let high = open.max(close) + rng.gen_range(0.0..intraday_range / 2.0);
        let low = open.min(close) - rng.gen_range(0.0..intraday_range / 2.0);

        // Volume rises on volatile days
        let base_volume = 1_000_000.0;
        let volume_multiplier = 1.0 + daily_return.abs() * 10.0;
        let volume = (base_volume * volume_multiplier * rng.gen_range(0.8..1.2)).round();

        let mut bar = Bar::new(date, open, high, low, close, volume);
        bar.symbol = symbol.map(str::to_string);
        bars.push(bar);

        price = new_price;
    }

    bars
}
