/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Ordered mapping of human-readable field names to the submitted values.
///
/// Key order is preserved so the summary renders in the order fields were
/// declared on the request.
pub type InputSummary = indexmap::IndexMap<String, serde_json::Value>;

/// Round a value to two decimal places, ties to even.
///
/// Ties are judged on the exact binary value, so `0.125` rounds to `0.12`
/// while `2.675` (stored just below the tie) rounds to `2.67`.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    // Beyond 2^52 every f64 is already an integer.
    if !scaled.is_finite() || scaled.abs() >= 4_503_599_627_370_496.0 {
        return value;
    }
    // Exact residual of the multiplication.
    let residual = value.mul_add(100.0, -scaled);
    let floor = scaled.floor();
    let fraction = scaled - floor;

    let rounded = if fraction > 0.5 {
        floor + 1.0
    } else if fraction < 0.5 {
        floor
    } else if residual > 0.0 {
        floor + 1.0
    } else if residual < 0.0 {
        floor
    } else if floor % 2.0 == 0.0 {
        floor
    } else {
        floor + 1.0
    };
    rounded / 100.0
}
