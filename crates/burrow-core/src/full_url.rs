use std::fmt::Display;

/// The original byte sequence submitted for shortening.
///
/// No URL syntax is enforced: any byte string is a valid key. Rejecting an
/// empty body is the job of the boundary that receives it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FullUrl(Vec<u8>);

impl FullUrl {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for FullUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl From<&str> for FullUrl {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

impl From<String> for FullUrl {
    fn from(value: String) -> Self {
        Self(value.into_bytes())
    }
}

impl From<&[u8]> for FullUrl {
    fn from(value: &[u8]) -> Self {
        Self(value.to_vec())
    }
}

impl From<Vec<u8>> for FullUrl {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_raw_bytes() {
        let url = FullUrl::from(&[0xff, b'a'][..]);
        assert_eq!(url.as_bytes(), &[0xff, b'a']);
        assert_eq!(url.len(), 2);
    }

    #[test]
    fn display_is_lossy_utf8() {
        assert_eq!(FullUrl::from("http://tt.t").to_string(), "http://tt.t");
        assert_eq!(FullUrl::from(vec![b'a', 0xff]).to_string(), "a\u{fffd}");
    }
}
