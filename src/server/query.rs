use crate::error::FeatureParseError;

/// Query key carrying feature values.
pub const FEATURES_KEY: &str = "features";

/// Collects feature values from decoded query pairs.
///
/// Every `features` parameter may hold one value or a comma separated list;
/// repeated parameters are concatenated in order. Returns `Ok(None)` when the
/// key is absent altogether.
///
/// # Errors
/// Returns the first value that does not parse as `f64`, including empty
/// entries such as the middle of `1,,2`.
pub fn parse_features(pairs: &[(String, String)]) -> Result<Option<Vec<f64>>, FeatureParseError> {
    let mut present = false;
    let mut features = Vec::new();

    for (_, raw) in pairs.iter().filter(|(key, _)| key == FEATURES_KEY) {
        present = true;
        for part in raw.split(',') {
            let part = part.trim();
            let value: f64 = part.parse().map_err(|_| FeatureParseError {
                position: features.len(),
                value: part.to_string(),
            })?;
            features.push(value);
        }
    }

    Ok(present.then_some(features))
}
