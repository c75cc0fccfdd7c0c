/// Compact count for table cells: `45000` renders as `45.0K`, `1200000` as `1.2M`.
/// The tenths digit rounds half up, so `1250` is `1.3K`.
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        compact(n, 1_000_000, 'M')
    } else if n >= 1_000 {
        compact(n, 1_000, 'K')
    } else {
        n.to_string()
    }
}

fn compact(n: u64, unit: u64, suffix: char) -> String {
    let tenths = (u128::from(n) * 10 + u128::from(unit / 2)) / u128::from(unit);
    format!("{}.{}{suffix}", tenths / 10, tenths % 10)
}
