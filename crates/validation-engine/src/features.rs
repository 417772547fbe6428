//! Numeric feature extraction from parsed documents.
//!
//! Pure and deterministic: the same `ParsedDocument` always yields a
//! bit-identical vector. Character frequencies are accumulated in a
//! `BTreeMap` so floating-point summation order never varies between runs.

use crate::patterns::{CURRENCY_RE, DATE_PATTERNS, NUMBER_RE};
use shared_types::{FeatureVector, ParsedDocument, FEATURE_COUNT};
use std::collections::BTreeMap;

pub struct FeatureExtractor;

impl FeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract the canonical 18-feature vector.
    pub fn extract(&self, document: &ParsedDocument) -> FeatureVector {
        let text = document.text.as_str();
        let chars: Vec<char> = text.chars().collect();
        let char_count = chars.len() as f64;
        let words: Vec<&str> = text.split_whitespace().collect();

        let avg_word_length = if words.is_empty() {
            0.0
        } else {
            words.iter().map(|w| w.chars().count() as f64).sum::<f64>() / words.len() as f64
        };

        let lines: Vec<&str> = text.split('\n').collect();
        let non_empty_lines = lines.iter().filter(|l| !l.trim().is_empty()).count();

        let (whitespace_ratio, uppercase_ratio, digit_ratio, special_char_ratio) =
            if chars.is_empty() {
                (0.0, 0.0, 0.0, 0.0)
            } else {
                let spaces = chars.iter().filter(|c| **c == ' ').count() as f64;
                let uppercase = chars.iter().filter(|c| c.is_uppercase()).count() as f64;
                let digits = chars.iter().filter(|c| c.is_ascii_digit()).count() as f64;
                let special = chars
                    .iter()
                    .filter(|c| !c.is_alphanumeric() && !c.is_whitespace())
                    .count() as f64;
                (
                    spaces / char_count,
                    uppercase / char_count,
                    digits / char_count,
                    special / char_count,
                )
            };

        let numbers = extract_numbers(text);
        let (number_mean, number_std, number_max) = if numbers.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            let mean = numbers.iter().sum::<f64>() / numbers.len() as f64;
            let variance =
                numbers.iter().map(|n| (n - mean).powi(2)).sum::<f64>() / numbers.len() as f64;
            let max = numbers.iter().fold(f64::MIN, |a, &b| a.max(b));
            (mean, variance.sqrt(), max)
        };

        let date_count: usize = DATE_PATTERNS.iter().map(|re| re.find_iter(text).count()).sum();

        let empty_line_ratio = if lines.is_empty() {
            0.0
        } else {
            (lines.len() - non_empty_lines) as f64 / lines.len() as f64
        };

        let csv_row_consistency = match document.table_shape {
            Some(shape) if shape.rows > 0 => shape.consistent_rows as f64 / shape.rows as f64,
            _ => 1.0,
        };

        let mut values = [0.0; FEATURE_COUNT];
        values[0] = char_count;
        values[1] = words.len() as f64;
        values[2] = avg_word_length;
        values[3] = lines.len() as f64;
        values[4] = whitespace_ratio;
        values[5] = shannon_entropy(&chars);
        values[6] = uppercase_ratio;
        values[7] = digit_ratio;
        values[8] = special_char_ratio;
        values[9] = numbers.len() as f64;
        values[10] = number_mean;
        values[11] = number_std;
        values[12] = number_max;
        values[13] = CURRENCY_RE.find_iter(text).count() as f64;
        values[14] = date_count as f64;
        values[15] = empty_line_ratio;
        values[16] = if document.ocr_used { 1.0 } else { 0.0 };
        values[17] = csv_row_consistency;

        FeatureVector::new(values)
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Shannon entropy over characters. Low entropy means repetitive filler,
/// very high entropy means noise; both are quality signals.
fn shannon_entropy(chars: &[char]) -> f64 {
    if chars.is_empty() {
        return 0.0;
    }
    let mut counts: BTreeMap<char, usize> = BTreeMap::new();
    for c in chars {
        *counts.entry(*c).or_insert(0) += 1;
    }
    let total = chars.len() as f64;
    -counts
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            p * p.log2()
        })
        .sum::<f64>()
}

fn extract_numbers(text: &str) -> Vec<f64> {
    NUMBER_RE
        .find_iter(text)
        .filter_map(|m| m.as_str().replace(',', "").parse::<f64>().ok())
        .collect()
}
