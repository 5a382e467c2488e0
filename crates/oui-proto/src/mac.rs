use std::fmt;
use std::str::FromStr;

/// Length of a full colon-separated MAC address (XX:XX:XX:XX:XX:XX)
pub const MAX_CANONICAL_LEN: usize = 17;

/// Length of an OUI prefix in canonical form (XX:XX:XX)
pub const OUI_PREFIX_LEN: usize = 8;

/// A MAC address or OUI string in canonical colon-separated form.
///
/// Produced by [`normalize`] (permissive) or [`normalize_strict`]. The lenient
/// path performs no validation, so the contents may be malformed; such values
/// simply never match a stored prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalMac(String);

impl CanonicalMac {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first 8 characters (the first 3 octets), or the whole string when shorter
    pub fn oui_prefix(&self) -> &str {
        match self.0.char_indices().nth(OUI_PREFIX_LEN) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalMac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<MacAddress> for CanonicalMac {
    fn from(mac: MacAddress) -> Self {
        CanonicalMac(mac.to_string())
    }
}

impl AsRef<str> for CanonicalMac {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Split a contiguous hex string into 2-character chunks joined by `:`.
///
/// An odd trailing character is kept as its own chunk.
pub fn create_mac_address(hex: &str) -> String {
    let chars: Vec<char> = hex.chars().collect();
    chars
        .chunks(2)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(":")
}

/// Normalize a user-supplied MAC address into canonical colon form.
///
/// - `-` anywhere but index 0: every `-` becomes `:`
/// - no `:` at all, or longer than a full colon form: re-chunked as contiguous hex
/// - otherwise returned unchanged
///
/// Case is preserved and nothing is validated.
pub fn normalize(input: &str) -> CanonicalMac {
    if matches!(input.find('-'), Some(pos) if pos > 0) {
        return CanonicalMac(input.replace('-', ":"));
    }

    if !input.contains(':') || input.chars().count() > MAX_CANONICAL_LEN {
        return CanonicalMac(create_mac_address(input));
    }

    CanonicalMac(input.to_string())
}

/// Normalize with validation: the input must describe exactly 6 octets.
///
/// The result is rendered uppercase.
pub fn normalize_strict(input: &str) -> Result<CanonicalMac, MacParseError> {
    let mac: MacAddress = input.parse()?;
    Ok(mac.into())
}

/// Reasons a strict MAC address parse can fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MacParseError {
    /// Wrong number of octets
    OctetCount(usize),
    /// An octet that is not exactly two hex digits
    InvalidOctet(String),
}

impl fmt::Display for MacParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OctetCount(n) => write!(f, "expected 6 octets, got {}", n),
            Self::InvalidOctet(octet) => write!(f, "invalid octet '{}'", octet),
        }
    }
}

impl std::error::Error for MacParseError {}

/// MAC address representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Create a new MAC address from a byte array
    pub fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Get the underlying byte array
    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// Locally administered bit (U/L) of the first octet
    pub fn is_locally_administered(&self) -> bool {
        self.0[0] & 0x02 != 0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl FromStr for MacAddress {
    type Err = MacParseError;

    /// Parse `XX:XX:XX:XX:XX:XX`, `XX-XX-XX-XX-XX-XX` or `XXXXXXXXXXXX`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let joined;
        let parts: Vec<&str> = if s.contains(':') {
            s.split(':').collect()
        } else if s.contains('-') {
            s.split('-').collect()
        } else {
            joined = create_mac_address(s);
            joined.split(':').collect()
        };

        if parts.len() != 6 {
            return Err(MacParseError::OctetCount(parts.len()));
        }

        let mut bytes = [0u8; 6];
        for (i, part) in parts.iter().enumerate() {
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(MacParseError::InvalidOctet(part.to_string()));
            }
            bytes[i] = u8::from_str_radix(part, 16)
                .map_err(|_| MacParseError::InvalidOctet(part.to_string()))?;
        }

        Ok(Self(bytes))
    }
}
