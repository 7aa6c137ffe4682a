use crate::error::CoreError;
use crate::shortcode::ShortCode;

/// The symbol set every deployed code has been issued over.
pub const DEFAULT_ALPHABET: &str =
    "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

const MIN_SYMBOLS: usize = 3;
const MAX_SYMBOLS: usize = 64;

/// A validated, ordered set of code symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<u8>,
}

impl Alphabet {
    /// Validates `symbols` as an alphabet.
    ///
    /// Symbols must be unique characters from `[a-zA-Z0-9_-]`, between 3 and
    /// 64 of them. Fewer than three would leave a positional radix below two.
    pub fn new(symbols: &str) -> Result<Self, CoreError> {
        let bytes = symbols.as_bytes();

        if bytes.len() < MIN_SYMBOLS || bytes.len() > MAX_SYMBOLS {
            return Err(CoreError::InvalidAlphabet(format!(
                "expected between {} and {} symbols, got {}",
                MIN_SYMBOLS,
                MAX_SYMBOLS,
                bytes.len()
            )));
        }

        if let Some(c) = symbols
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(CoreError::InvalidAlphabet(format!(
                "symbol '{}' is not allowed in a short code",
                c
            )));
        }

        let mut seen = [false; 128];
        for &b in bytes {
            if seen[b as usize] {
                return Err(CoreError::InvalidAlphabet(format!(
                    "symbol '{}' appears more than once",
                    b as char
                )));
            }
            seen[b as usize] = true;
        }

        Ok(Self {
            symbols: bytes.to_vec(),
        })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn as_str(&self) -> &str {
        // symbols were validated as ASCII in `new`
        std::str::from_utf8(&self.symbols).unwrap_or_default()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_ALPHABET.as_bytes().to_vec(),
        }
    }
}

/// Converts identifiers into short codes.
///
/// The positional radix is one less than the alphabet size, and digits are
/// written least significant first without a final reversal. Both quirks are
/// part of the issued code format: with the default alphabet `Z` never
/// appears, and `61` encodes as `"01"`. Changing either would make new codes
/// disagree with every code already stored.
///
/// There is no decoder. Codes are opaque index keys.
#[derive(Debug, Clone, Default)]
pub struct CodeCodec {
    alphabet: Alphabet,
}

impl CodeCodec {
    pub fn new(alphabet: Alphabet) -> Self {
        Self { alphabet }
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// The positional base used by [`encode`][Self::encode].
    pub fn radix(&self) -> u64 {
        self.alphabet.len() as u64 - 1
    }

    /// Encodes `id`. Zero yields an empty code.
    pub fn encode(&self, id: u64) -> ShortCode {
        let radix = self.radix();
        let mut code = String::new();
        let mut rest = id;

        while rest > 0 {
            code.push(self.alphabet.symbols[(rest % radix) as usize] as char);
            rest /= radix;
        }

        ShortCode::new_unchecked(code)
    }
}
