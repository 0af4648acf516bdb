use crate::formats::AvailabilityStatus;

const POSITIVE: &[&str] = &[
    "1",
    "true",
    "yes",
    "available",
    "in stock",
    "instock",
    "onhand",
    "active",
    "متوفر",
    "متاح",
    "نعم",
];

const NEGATIVE: &[&str] = &[
    "0",
    "false",
    "no",
    "not available",
    "out of stock",
    "outofstock",
    "discontinued",
    "inactive",
    "غير متوفر",
    "غير متاح",
    "لا",
    "نفد",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Availability {
    pub status: AvailabilityStatus,
    pub quantity: u32,
}

impl Availability {
    pub const UNAVAILABLE: Self = Self {
        status: AvailabilityStatus::Unavailable,
        quantity: 0,
    };

    /// "In stock" with no count. Reported as a single copy.
    pub const AVAILABLE_UNCOUNTED: Self = Self {
        status: AvailabilityStatus::Available,
        quantity: 1,
    };
}

/// Interprets the availability cell.
///
/// The cell holds a stock count, a yes/no word, or (in older sheets) the cover
/// image URL of a book that is in stock. Anything unrecognized is unavailable.
#[must_use]
pub fn resolve(raw: Option<&str>) -> Availability {
    let Some(raw) = raw else {
        return Availability::UNAVAILABLE;
    };
    if raw.starts_with("http") {
        return Availability::AVAILABLE_UNCOUNTED;
    }

    let trimmed = raw.trim();
    if let Some(count) = parse_leading_int(trimmed) {
        return if count > 0 {
            Availability {
                status: AvailabilityStatus::Available,
                quantity: u32::try_from(count).unwrap_or(u32::MAX),
            }
        } else {
            Availability::UNAVAILABLE
        };
    }

    match classify_text(trimmed) {
        Some(AvailabilityStatus::Available) => Availability::AVAILABLE_UNCOUNTED,
        Some(AvailabilityStatus::Unavailable) | None => Availability::UNAVAILABLE,
    }
}

/// Matches a word against the yes/no vocabulary. `None` when it is in neither list.
#[must_use]
pub fn classify_text(text: &str) -> Option<AvailabilityStatus> {
    let lowered = text.trim().to_lowercase();
    if POSITIVE.contains(&lowered.as_str()) {
        Some(AvailabilityStatus::Available)
    } else if NEGATIVE.contains(&lowered.as_str()) {
        Some(AvailabilityStatus::Unavailable)
    } else {
        None
    }
}

/// Parses an optional sign followed by digits, ignoring whatever trails them
/// (`"3 copies"` is 3). A `0x` prefix switches to hex, as `parseInt` does.
/// Returns `None` when no digit leads the text.
pub(crate) fn parse_leading_int(text: &str) -> Option<i64> {
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let (radix, rest) = match rest.get(..2) {
        Some("0x" | "0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let digits = rest
        .bytes()
        .take_while(|b| char::from(*b).is_digit(radix))
        .count();
    if digits == 0 {
        return None;
    }

    let magnitude = i64::from_str_radix(&rest[..digits], radix).unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}
