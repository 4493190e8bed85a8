//! Structural recognizers for the S7 address grammars
//!
//! Four textually overlapping grammars denote S7 fields:
//!
//! 1. Full data-block form: `%DB<block>.DB<size?><byte>(.<bit>)?:<type>([n])?`
//! 2. Generic symbolic form: `%<area><size?><byte>(.<bit>)?:<type>([n])?`
//! 3. Short data-block form: `%DB<block>:<byte>(.<bit>)?:<type>([n])?`
//! 4. Packed Simotion form: ten hyphen-joined 2-digit hex groups
//!
//! The recognizers in this module are purely structural: they decide
//! whether a token has the shape of a grammar and extract the raw
//! captures, but never consult the type tables. Semantic validation
//! happens in [`crate::field`]. Evaluation order matters and is owned
//! by the dispatcher: the full data-block form is strictly more
//! specific than the generic form and must be tried first.

/// Raw captures extracted from a symbolic address token
///
/// All captures are unvalidated slices of the input; the dispatcher
/// resolves them against the type tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SymbolicCaptures<'a> {
    /// Memory area code (generic form only; data-block forms imply DB)
    pub memory_area_code: Option<&'a str>,
    /// Data block number digits (data-block forms only)
    pub block_number: Option<&'a str>,
    /// Explicit transfer size code, if one was written
    pub size_code: Option<char>,
    /// Byte offset digits (1-7 digits)
    pub byte_offset: &'a str,
    /// Bit offset digit (0-7), if one was written
    pub bit_offset: Option<&'a str>,
    /// Data type name (transport size table name)
    pub data_type: &'a str,
    /// Element count digits from the trailing `[n]`, if present
    pub num_elements: Option<&'a str>,
}

/// Minimal left-to-right scanner over an address token
///
/// Each method consumes input on success and leaves the position
/// untouched on failure, except where noted by the recognizers (a
/// consumed literal followed by a failed mandatory capture fails the
/// whole recognizer, which matches the anchored-pattern semantics of
/// the original grammars).
struct Scanner<'a> {
    rest: &'a str,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self { rest: input }
    }

    /// Consume an exact literal
    fn tag(&mut self, literal: &str) -> bool {
        if let Some(rest) = self.rest.strip_prefix(literal) {
            self.rest = rest;
            true
        } else {
            false
        }
    }

    /// Consume between `min` and `max` ASCII digits, greedily
    fn digits(&mut self, min: usize, max: usize) -> Option<&'a str> {
        let len = self
            .rest
            .bytes()
            .take(max)
            .take_while(|b| b.is_ascii_digit())
            .count();
        if len < min {
            return None;
        }
        let (digits, rest) = self.rest.split_at(len);
        self.rest = rest;
        Some(digits)
    }

    /// Consume one transfer size code character (`X`, `B`, `W`, `D`)
    fn size_code(&mut self) -> Option<char> {
        let c = self.rest.chars().next()?;
        if matches!(c, 'X' | 'B' | 'W' | 'D') {
            self.rest = &self.rest[1..];
            Some(c)
        } else {
            None
        }
    }

    /// Consume any single character (the generic area capture)
    fn any_char(&mut self) -> Option<&'a str> {
        let c = self.rest.chars().next()?;
        let (code, rest) = self.rest.split_at(c.len_utf8());
        self.rest = rest;
        Some(code)
    }

    /// Consume a single bit offset digit (`0`..`7`)
    fn bit_digit(&mut self) -> Option<&'a str> {
        match self.rest.as_bytes().first() {
            Some(b'0'..=b'7') => {
                let (digit, rest) = self.rest.split_at(1);
                self.rest = rest;
                Some(digit)
            }
            _ => None,
        }
    }

    /// Consume a type identifier (`ALPHA` / `_`, one or more)
    fn identifier(&mut self) -> Option<&'a str> {
        let len = self
            .rest
            .bytes()
            .take_while(|b| b.is_ascii_alphabetic() || *b == b'_')
            .count();
        if len == 0 {
            return None;
        }
        let (ident, rest) = self.rest.split_at(len);
        self.rest = rest;
        Some(ident)
    }

    /// Consume the optional `.bit` suffix of a byte offset
    ///
    /// Returns `Err(())` if a dot was present without a valid bit
    /// digit behind it, which fails the enclosing recognizer.
    fn opt_bit_offset(&mut self) -> Result<Option<&'a str>, ()> {
        if self.tag(".") {
            match self.bit_digit() {
                Some(digit) => Ok(Some(digit)),
                None => Err(()),
            }
        } else {
            Ok(None)
        }
    }

    /// Consume the optional trailing `[n]` element count
    fn opt_num_elements(&mut self) -> Result<Option<&'a str>, ()> {
        if self.tag("[") {
            let digits = self.digits(1, 10).ok_or(())?;
            if !self.tag("]") {
                return Err(());
            }
            Ok(Some(digits))
        } else {
            Ok(None)
        }
    }

    /// Check that the whole token has been consumed
    fn done(&self) -> bool {
        self.rest.is_empty()
    }
}

/// Match the full data-block form: `%DB1.DBX38.1:BOOL`
pub(crate) fn match_data_block(token: &str) -> Option<SymbolicCaptures<'_>> {
    let mut s = Scanner::new(token);
    if !s.tag("%DB") {
        return None;
    }
    let block_number = s.digits(1, 5)?;
    if !s.tag(".DB") {
        return None;
    }
    let size_code = s.size_code();
    let byte_offset = s.digits(1, 7)?;
    let bit_offset = s.opt_bit_offset().ok()?;
    if !s.tag(":") {
        return None;
    }
    let data_type = s.identifier()?;
    let num_elements = s.opt_num_elements().ok()?;
    if !s.done() {
        return None;
    }
    Some(SymbolicCaptures {
        memory_area_code: None,
        block_number: Some(block_number),
        size_code,
        byte_offset,
        bit_offset,
        data_type,
        num_elements,
    })
}

/// Match the generic symbolic form: `%I0.1:BOOL`, `%ID64:REAL`
///
/// The area capture accepts any single character; resolving it against
/// the memory area table is the dispatcher's job.
pub(crate) fn match_generic(token: &str) -> Option<SymbolicCaptures<'_>> {
    let mut s = Scanner::new(token);
    if !s.tag("%") {
        return None;
    }
    let memory_area_code = s.any_char()?;
    let size_code = s.size_code();
    let byte_offset = s.digits(1, 7)?;
    let bit_offset = s.opt_bit_offset().ok()?;
    if !s.tag(":") {
        return None;
    }
    let data_type = s.identifier()?;
    let num_elements = s.opt_num_elements().ok()?;
    if !s.done() {
        return None;
    }
    Some(SymbolicCaptures {
        memory_area_code: Some(memory_area_code),
        block_number: None,
        size_code,
        byte_offset,
        bit_offset,
        data_type,
        num_elements,
    })
}

/// Match the short data-block form: `%DB1:38.1:BOOL`
pub(crate) fn match_data_block_short(token: &str) -> Option<SymbolicCaptures<'_>> {
    let mut s = Scanner::new(token);
    if !s.tag("%DB") {
        return None;
    }
    let block_number = s.digits(1, 5)?;
    if !s.tag(":") {
        return None;
    }
    let byte_offset = s.digits(1, 7)?;
    let bit_offset = s.opt_bit_offset().ok()?;
    if !s.tag(":") {
        return None;
    }
    let data_type = s.identifier()?;
    let num_elements = s.opt_num_elements().ok()?;
    if !s.done() {
        return None;
    }
    Some(SymbolicCaptures {
        memory_area_code: None,
        block_number: Some(block_number),
        size_code: None,
        byte_offset,
        bit_offset,
        data_type,
        num_elements,
    })
}

/// Match the packed Simotion form structurally
///
/// Exactly ten 2-digit upper-case hex groups joined by single hyphens.
/// Lower-case hex is rejected, matching the original grammar.
pub(crate) fn is_simotion(token: &str) -> bool {
    let mut groups = 0usize;
    for group in token.split('-') {
        let ok = group.len() == 2
            && group
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b));
        if !ok {
            return false;
        }
        groups += 1;
    }
    groups == crate::PACKED_ADDRESS_BYTES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_data_block_captures() {
        let caps = match_data_block("%DB1.DBX38.1:BOOL").unwrap();
        assert_eq!(caps.block_number, Some("1"));
        assert_eq!(caps.size_code, Some('X'));
        assert_eq!(caps.byte_offset, "38");
        assert_eq!(caps.bit_offset, Some("1"));
        assert_eq!(caps.data_type, "BOOL");
        assert_eq!(caps.num_elements, None);

        let caps = match_data_block("%DB56.DBB100:SINT[25]").unwrap();
        assert_eq!(caps.block_number, Some("56"));
        assert_eq!(caps.size_code, Some('B'));
        assert_eq!(caps.byte_offset, "100");
        assert_eq!(caps.bit_offset, None);
        assert_eq!(caps.data_type, "SINT");
        assert_eq!(caps.num_elements, Some("25"));

        // No size code
        let caps = match_data_block("%DB3.DB4:INT").unwrap();
        assert_eq!(caps.size_code, None);
        assert_eq!(caps.byte_offset, "4");
    }

    #[test]
    fn test_full_data_block_rejects() {
        assert!(match_data_block("%DB1:38.1:BOOL").is_none());
        assert!(match_data_block("%I0.1:BOOL").is_none());
        assert!(match_data_block("%DB1.DBX38.1:BOOL extra").is_none());
        assert!(match_data_block("%DB123456.DBX38.1:BOOL").is_none());
        assert!(match_data_block("%DB1.DBX38.9:BOOL").is_none());
    }

    #[test]
    fn test_generic_captures() {
        let caps = match_generic("%I0.1:BOOL").unwrap();
        assert_eq!(caps.memory_area_code, Some("I"));
        assert_eq!(caps.size_code, None);
        assert_eq!(caps.byte_offset, "0");
        assert_eq!(caps.bit_offset, Some("1"));
        assert_eq!(caps.data_type, "BOOL");

        let caps = match_generic("%ID64:REAL").unwrap();
        assert_eq!(caps.memory_area_code, Some("I"));
        assert_eq!(caps.size_code, Some('D'));
        assert_eq!(caps.byte_offset, "64");
        assert_eq!(caps.bit_offset, None);

        // Structurally fine even though the size code will fail the
        // semantic cross-check later
        let caps = match_generic("%IW64:REAL").unwrap();
        assert_eq!(caps.size_code, Some('W'));
    }

    #[test]
    fn test_generic_rejects() {
        assert!(match_generic("%I0:").is_none());
        assert!(match_generic("%I:BOOL").is_none());
        assert!(match_generic("%I0.8:BOOL").is_none());
        assert!(match_generic("%I12345678:BOOL").is_none());
        // The short data-block form is not a generic match: the byte
        // offset position holds digits, not a type identifier
        assert!(match_generic("%DB1:38.1:BOOL").is_none());
        assert!(match_generic("I0.1:BOOL").is_none());
    }

    #[test]
    fn test_short_data_block_captures() {
        let caps = match_data_block_short("%DB1:38.1:BOOL").unwrap();
        assert_eq!(caps.block_number, Some("1"));
        assert_eq!(caps.size_code, None);
        assert_eq!(caps.byte_offset, "38");
        assert_eq!(caps.bit_offset, Some("1"));
        assert_eq!(caps.data_type, "BOOL");

        let caps = match_data_block_short("%DB400:8.0:REAL").unwrap();
        assert_eq!(caps.block_number, Some("400"));
        assert_eq!(caps.byte_offset, "8");
    }

    #[test]
    fn test_short_data_block_rejects() {
        assert!(match_data_block_short("%DB1:100").is_none());
        assert!(match_data_block_short("%DB1.DBX38.1:BOOL").is_none());
        assert!(match_data_block_short("%DB:38.1:BOOL").is_none());
    }

    #[test]
    fn test_simotion_shape() {
        assert!(is_simotion("10-08-00-01-00-2D-84-00-00-80"));
        assert!(is_simotion("A0-01-00-01-00-2D-84-00-00-08"));
        assert!(!is_simotion("10-08-00-01-00-2D-84-00-00"));
        assert!(!is_simotion("10-08-00-01-00-2D-84-00-00-80-00"));
        assert!(!is_simotion("10-08-00-01-00-2d-84-00-00-80"));
        assert!(!is_simotion("10-08-00-01-00-2G-84-00-00-80"));
        assert!(!is_simotion("%DB1:38.1:BOOL"));
        assert!(!is_simotion(""));
    }
}
