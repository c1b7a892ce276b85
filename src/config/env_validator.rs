//! Environment variable validation with helpful error messages
//!
//! Provides consistent validation for environment variable values with:
//! - Clear warning messages for invalid values
//! - Levenshtein-based typo suggestions
//! - Fallback to default values

/// Validator for environment variable values
pub struct EnvVarValidator<'a> {
    var_name: &'a str,
    valid_values: &'a [&'a str],
}

impl<'a> EnvVarValidator<'a> {
    /// Create a new validator for the given environment variable.
    ///
    /// `valid_values` is only used to build the warning text; pass an empty
    /// slice for free-form values such as numbers.
    pub fn new(var_name: &'a str, valid_values: &'a [&'a str]) -> Self {
        Self {
            var_name,
            valid_values,
        }
    }

    /// Parse a value, returning `default` if invalid and recording a warning
    pub fn parse<T, F>(&self, value: &str, parser: F, default: T, warnings: &mut Vec<String>) -> T
    where
        F: Fn(&str) -> Option<T>,
    {
        match parser(value) {
            Some(parsed) => parsed,
            None => {
                let mut message = format!(
                    "invalid {} value '{}'{}",
                    self.var_name,
                    value,
                    self.suggest(value)
                );
                if !self.valid_values.is_empty() {
                    message.push_str(&format!(" (valid values: {})", self.valid_values.join(", ")));
                }
                warnings.push(message);
                default
            }
        }
    }

    /// Suggest a valid value based on Levenshtein distance
    fn suggest(&self, value: &str) -> String {
        let input = value.to_lowercase();
        let mut best: Option<(&str, usize)> = None;

        for &valid in self.valid_values {
            let dist = levenshtein(&input, valid);
            match best {
                None => best = Some((valid, dist)),
                Some((_, best_dist)) if dist < best_dist => best = Some((valid, dist)),
                _ => {}
            }
        }

        // Only suggest if distance is reasonable (≤ 2 edits)
        match best {
            Some((suggested, dist)) if dist <= 2 && dist > 0 => {
                format!(". Did you mean '{}'?", suggested)
            }
            _ => String::new(),
        }
    }
}

/// Parse a boolean flag the way shells usually spell them
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Simple Levenshtein distance for typo detection
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let a_len = a_bytes.len();
    let b_len = b_bytes.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev_row: Vec<usize> = (0..=b_len).collect();
    let mut curr_row: Vec<usize> = vec![0; b_len + 1];

    for (i, a_char) in a_bytes.iter().enumerate() {
        curr_row[0] = i + 1;
        for (j, b_char) in b_bytes.iter().enumerate() {
            let cost = if a_char == b_char { 0 } else { 1 };
            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_len]
}
