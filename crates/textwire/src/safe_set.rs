use core::fmt;

/// Set of ASCII characters a [`PercentEncoder`](crate::PercentEncoder)
/// writes through without escaping.
///
/// Stored as a 128-bit bitmap, one bit per ASCII code point. The set is
/// `Copy`; every encoder starts from its own copy of
/// [`SafeCharacterSet::DEFAULT`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SafeCharacterSet {
    bits: u128,
}

impl SafeCharacterSet {
    /// Letters, digits and `$ - _ . ! * ' ( ) ,`.
    ///
    /// `+` is left out on purpose: form decoders read it as a space.
    pub const DEFAULT: Self = Self::EMPTY
        .with_range(b'a', b'z')
        .with_range(b'A', b'Z')
        .with_range(b'0', b'9')
        .with(b'$')
        .with(b'-')
        .with(b'_')
        .with(b'.')
        .with(b'!')
        .with(b'*')
        .with(b'\'')
        .with(b'(')
        .with(b')')
        .with(b',');

    /// No characters at all.
    pub const EMPTY: Self = Self { bits: 0 };

    /// Return a copy of the set that also contains `byte`. Non-ASCII bytes
    /// are ignored.
    #[must_use]
    pub const fn with(self, byte: u8) -> Self {
        if byte.is_ascii() {
            Self {
                bits: self.bits | (1 << byte),
            }
        } else {
            self
        }
    }

    #[must_use]
    const fn with_range(self, first: u8, last: u8) -> Self {
        let mut set = self;
        let mut b = first;
        while b <= last {
            set = set.with(b);
            b += 1;
        }
        set
    }

    /// Add `c` to the set. Returns `false`, leaving the set unchanged, if
    /// `c` is not ASCII.
    pub fn insert(&mut self, c: char) -> bool {
        if !c.is_ascii() {
            return false;
        }
        *self = self.with(c as u8);
        true
    }

    /// Whether the UTF-16 code unit `unit` is in the set.
    #[must_use]
    pub const fn contains_unit(&self, unit: u16) -> bool {
        unit < 128 && self.bits & (1 << unit) != 0
    }

    /// Whether `c` is in the set.
    #[must_use]
    pub fn contains(&self, c: char) -> bool {
        c.is_ascii() && self.contains_unit(c as u16)
    }

    /// Characters in the set, in code point order.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        (0u8..128)
            .filter(|&b| self.contains_unit(u16::from(b)))
            .map(char::from)
    }

    /// Number of characters in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Whether the set has no characters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl Default for SafeCharacterSet {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Debug for SafeCharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
