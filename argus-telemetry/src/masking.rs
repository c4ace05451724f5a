//! Sensitive data masking for logs and console output.
//!
//! Masks customer account identifiers and access tokens so alert payloads
//! can be printed or logged without exposing them.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

/// Patterns for detecting sensitive data.
static PATTERNS: LazyLock<Vec<SensitivePattern>> = LazyLock::new(|| {
    vec![
        // Customer and merchant account ids (C1231006815, M1979787155)
        SensitivePattern {
            regex: Regex::new(r"\b[CM]\d{9,10}\b").expect("account id pattern"),
            group: 0,
        },
        // Bearer tokens
        SensitivePattern {
            regex: Regex::new(r"(?i)bearer\s+([a-zA-Z0-9._-]{20,})").expect("bearer pattern"),
            group: 1,
        },
        // Tokens passed in a query string
        SensitivePattern {
            regex: Regex::new(r"(?i)[?&](?:access_)?token=([^&\s]+)").expect("token pattern"),
            group: 1,
        },
    ]
});

struct SensitivePattern {
    regex: Regex,
    group: usize,
}

/// Masks sensitive data in strings.
#[derive(Debug, Clone)]
pub struct SensitiveDataMasker {
    /// Minimum length of string to consider for partial masking
    min_length: usize,
    /// Characters to show at start of masked value
    show_start: usize,
    /// Characters to show at end of masked value
    show_end: usize,
    /// Mask character
    mask_char: char,
}

impl Default for SensitiveDataMasker {
    fn default() -> Self {
        Self::new()
    }
}

impl SensitiveDataMasker {
    /// Create a new masker with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_length: 8,
            show_start: 1,
            show_end: 4,
            mask_char: '*',
        }
    }

    /// Create a masker with custom settings.
    #[must_use]
    pub fn with_settings(min_length: usize, show_start: usize, show_end: usize) -> Self {
        Self {
            min_length,
            show_start,
            show_end,
            mask_char: '*',
        }
    }

    /// Mask a known sensitive value.
    ///
    /// # Example
    ///
    /// ```
    /// use argus_telemetry::masking::SensitiveDataMasker;
    ///
    /// let masker = SensitiveDataMasker::new();
    /// assert_eq!(masker.mask_value("C1231006815"), "C***6815");
    /// ```
    #[must_use]
    pub fn mask_value(&self, value: &str) -> String {
        let chars: Vec<char> = value.chars().collect();
        let mask = self.mask_char.to_string().repeat(3);

        if chars.len() < self.min_length || chars.len() <= self.show_start + self.show_end {
            return self.mask_char.to_string().repeat(chars.len().max(3));
        }

        let start: String = chars[..self.show_start].iter().collect();
        let end: String = chars[chars.len() - self.show_end..].iter().collect();
        format!("{start}{mask}{end}")
    }

    /// Mask every sensitive match in a string.
    ///
    /// # Example
    ///
    /// ```
    /// use argus_telemetry::masking::SensitiveDataMasker;
    ///
    /// let masker = SensitiveDataMasker::new();
    /// let masked = masker.mask_string(r#"{"nameOrig": "C1231006815", "nameDest": "M1979787155"}"#);
    /// assert!(!masked.contains("C1231006815"));
    /// assert!(!masked.contains("M1979787155"));
    /// ```
    #[must_use]
    pub fn mask_string<'a>(&self, input: &'a str) -> Cow<'a, str> {
        let mut result = Cow::Borrowed(input);

        for pattern in PATTERNS.iter() {
            if !pattern.regex.is_match(&result) {
                continue;
            }
            let replaced = pattern
                .regex
                .replace_all(&result, |caps: &Captures<'_>| {
                    let whole = &caps[0];
                    match caps.get(pattern.group) {
                        Some(secret) if pattern.group > 0 => {
                            let offset = secret.start() - caps.get(0).map_or(0, |m| m.start());
                            format!(
                                "{}{}{}",
                                &whole[..offset],
                                self.mask_value(secret.as_str()),
                                &whole[offset + secret.len()..]
                            )
                        }
                        _ => self.mask_value(whole),
                    }
                })
                .into_owned();
            result = Cow::Owned(replaced);
        }

        result
    }

    /// Check if a string contains sensitive patterns.
    #[must_use]
    pub fn contains_sensitive(&self, input: &str) -> bool {
        PATTERNS.iter().any(|p| p.regex.is_match(input))
    }
}

/// Account identifier or token that renders masked.
///
/// `Display`, `Debug` and `Serialize` all emit the partially masked form, so
/// the raw value only leaves through [`expose`](Self::expose).
///
/// ```
/// use argus_telemetry::masking::Sensitive;
///
/// let account = Sensitive::new("C1231006815");
/// assert_eq!(account.to_string(), "C***6815");
/// assert_eq!(account.expose(), &"C1231006815");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Sensitive<T>(T);

impl<T: AsRef<str>> Sensitive<T> {
    /// Wraps a sensitive value.
    pub const fn new(value: T) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    pub const fn expose(&self) -> &T {
        &self.0
    }

    /// Returns the raw value, consuming the wrapper.
    pub fn into_inner(self) -> T {
        self.0
    }

    fn masked(&self) -> String {
        SensitiveDataMasker::new().mask_value(self.0.as_ref())
    }
}

impl<T: AsRef<str>> std::fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.masked())
    }
}

impl<T: AsRef<str>> std::fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sensitive({})", self.masked())
    }
}

impl<T: AsRef<str>> serde::Serialize for Sensitive<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.masked())
    }
}
