use std::fmt;

/// Length of the inline free-form text buffer carried by every [`Record`].
pub const FREETEXT_LEN: usize = 64;

/// Fixed-size trade record passed through a [`RingQueue`](crate::RingQueue).
///
/// The layout is plain data with no heap indirection, so records are stored
/// inline in the queue's preallocated slots and copied in and out by value.
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct Record {
    value: u64,
    instrument: u64,
    price: u64,
    quantity: u32,
    side: bool,
    freetext: [u8; FREETEXT_LEN],
}

impl Record {
    /// Creates a record carrying only an identifier; every other field is zero.
    pub const fn new(value: u64) -> Self {
        Self {
            value,
            instrument: 0,
            price: 0,
            quantity: 0,
            side: false,
            freetext: [0; FREETEXT_LEN],
        }
    }

    /// Returns the record identifier.
    #[inline]
    pub const fn value(&self) -> u64 {
        self.value
    }

    #[inline]
    pub const fn instrument(&self) -> u64 {
        self.instrument
    }

    #[inline]
    pub const fn price(&self) -> u64 {
        self.price
    }

    #[inline]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    #[inline]
    pub const fn side(&self) -> bool {
        self.side
    }

    /// Returns the raw free-form text buffer.
    #[inline]
    pub const fn freetext(&self) -> &[u8; FREETEXT_LEN] {
        &self.freetext
    }

    /// Returns the free-form text up to the first NUL byte, if it is valid UTF-8.
    pub fn freetext_str(&self) -> Option<&str> {
        let end = self
            .freetext
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(FREETEXT_LEN);
        std::str::from_utf8(&self.freetext[..end]).ok()
    }

    pub const fn with_instrument(mut self, instrument: u64) -> Self {
        self.instrument = instrument;
        self
    }

    pub const fn with_price(mut self, price: u64) -> Self {
        self.price = price;
        self
    }

    pub const fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub const fn with_side(mut self, side: bool) -> Self {
        self.side = side;
        self
    }

    /// Copies `text` into the free-form buffer, truncating at [`FREETEXT_LEN`] bytes.
    ///
    /// Bytes past the end of `text` are zeroed.
    pub fn with_freetext(mut self, text: &[u8]) -> Self {
        let n = text.len().min(FREETEXT_LEN);
        self.freetext = [0; FREETEXT_LEN];
        self.freetext[..n].copy_from_slice(&text[..n]);
        self
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new(0)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("value", &self.value)
            .field("instrument", &self.instrument)
            .field("price", &self.price)
            .field("quantity", &self.quantity)
            .field("side", &self.side)
            .field("freetext", &self.freetext_str().unwrap_or("<binary>"))
            .finish()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{} {} {} {} {}",
            self.value, self.instrument, self.price, self.quantity, self.side
        )?;
        match self.freetext_str() {
            Some(text) if !text.is_empty() => write!(f, " {text:?}}}"),
            _ => f.write_str("}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sets_only_value() {
        let r = Record::new(42);
        assert_eq!(r.value(), 42);
        assert_eq!(r.instrument(), 0);
        assert_eq!(r.price(), 0);
        assert_eq!(r.quantity(), 0);
        assert!(!r.side());
        assert_eq!(r.freetext(), &[0; FREETEXT_LEN]);
        assert_eq!(Record::default(), Record::new(0));
    }

    #[test]
    fn test_builder_fields() {
        let r = Record::new(7)
            .with_instrument(11)
            .with_price(1_250)
            .with_quantity(300)
            .with_side(true)
            .with_freetext(b"limit order");

        assert_eq!(r.instrument(), 11);
        assert_eq!(r.price(), 1_250);
        assert_eq!(r.quantity(), 300);
        assert!(r.side());
        assert_eq!(r.freetext_str(), Some("limit order"));
    }

    #[test]
    fn test_freetext_truncates() {
        let long = [b'x'; FREETEXT_LEN + 10];
        let r = Record::new(1).with_freetext(&long);
        assert_eq!(r.freetext(), &[b'x'; FREETEXT_LEN]);
        assert_eq!(r.freetext_str().map(str::len), Some(FREETEXT_LEN));

        // Shorter text clears the old tail
        let r = r.with_freetext(b"ab");
        assert_eq!(r.freetext_str(), Some("ab"));
        assert_eq!(r.freetext()[2], 0);
    }

    #[test]
    fn test_freetext_invalid_utf8() {
        let r = Record::new(1).with_freetext(&[0xff, 0xfe]);
        assert_eq!(r.freetext_str(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Record::new(3).to_string(), "{3 0 0 0 false}");
        let r = Record::new(3).with_side(true).with_freetext(b"hi");
        assert_eq!(r.to_string(), "{3 0 0 0 true \"hi\"}");
    }
}
