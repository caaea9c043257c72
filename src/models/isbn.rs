//! ISBN normalization
//!
//! Accepts ISBN-10 or ISBN-13 input with optional hyphens or spaces and
//! produces the bare 13-digit form that is stored in the `books` table.

use std::fmt;

/// A checksum-verified ISBN-13
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Isbn(String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IsbnError {
    Empty,
    Length(usize),
    Character,
    Checksum,
}

impl fmt::Display for IsbnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IsbnError::Empty => write!(f, "ISBN is required"),
            IsbnError::Length(n) => write!(f, "ISBN must have 10 or 13 digits, got {}", n),
            IsbnError::Character => write!(f, "ISBN contains invalid characters"),
            IsbnError::Checksum => write!(f, "ISBN checksum is invalid"),
        }
    }
}

impl Isbn {
    pub fn parse(raw: &str) -> Result<Self, IsbnError> {
        let compact: String = raw
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != ' ')
            .collect();

        match compact.len() {
            0 => Err(IsbnError::Empty),
            10 => {
                let digits = isbn10_digits(&compact)?;
                Ok(Self(isbn10_to_13(&digits)))
            }
            13 => {
                if !compact.chars().all(|c| c.is_ascii_digit()) {
                    return Err(IsbnError::Character);
                }
                let digits: Vec<u32> = compact.chars().filter_map(|c| c.to_digit(10)).collect();
                if isbn13_check_digit(&digits[..12]) != digits[12] {
                    return Err(IsbnError::Checksum);
                }
                Ok(Self(compact))
            }
            n => Err(IsbnError::Length(n)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Digits of an ISBN-10 after checksum verification (`X` counts as 10)
fn isbn10_digits(compact: &str) -> Result<Vec<u32>, IsbnError> {
    let mut digits = Vec::with_capacity(10);
    for (i, c) in compact.chars().enumerate() {
        match c {
            '0'..='9' => digits.push(c as u32 - '0' as u32),
            'X' | 'x' if i == 9 => digits.push(10),
            _ => return Err(IsbnError::Character),
        }
    }
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| (10 - i as u32) * d)
        .sum();
    if sum % 11 != 0 {
        return Err(IsbnError::Checksum);
    }
    Ok(digits)
}

fn isbn10_to_13(digits: &[u32]) -> String {
    let mut body = vec![9, 7, 8];
    body.extend_from_slice(&digits[..9]);
    let check = isbn13_check_digit(&body);
    body.push(check);
    body.iter().map(|d| char::from(b'0' + *d as u8)).collect()
}

fn isbn13_check_digit(first_twelve: &[u32]) -> u32 {
    let sum: u32 = first_twelve
        .iter()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { *d } else { d * 3 })
        .sum();
    (10 - sum % 10) % 10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_isbn13() {
        let isbn = Isbn::parse("9780141439518").unwrap();
        assert_eq!(isbn.as_str(), "9780141439518");
    }

    #[test]
    fn test_parse_strips_hyphens() {
        let isbn = Isbn::parse("978-0-14-143951-8").unwrap();
        assert_eq!(isbn.as_str(), "9780141439518");
    }

    #[test]
    fn test_parse_isbn10_converts() {
        // Pride and Prejudice, Penguin Classics
        let isbn = Isbn::parse("0-14-143951-3").unwrap();
        assert_eq!(isbn.as_str(), "9780141439518");
    }

    #[test]
    fn test_parse_isbn10_with_x() {
        let isbn = Isbn::parse("080442957X").unwrap();
        assert_eq!(isbn.as_str(), "9780804429573");
    }

    #[test]
    fn test_bad_checksum() {
        assert_eq!(Isbn::parse("9780141439519"), Err(IsbnError::Checksum));
        assert_eq!(Isbn::parse("0141439514"), Err(IsbnError::Checksum));
    }

    #[test]
    fn test_bad_length_and_chars() {
        assert_eq!(Isbn::parse(""), Err(IsbnError::Empty));
        assert_eq!(Isbn::parse("12345"), Err(IsbnError::Length(5)));
        assert_eq!(Isbn::parse("978014143951A"), Err(IsbnError::Character));
    }
}
