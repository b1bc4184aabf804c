//! Streaming PGN parser.
//!
//! A pull parser over any [`std::io::Read`] source. Input is consumed
//! through two fixed-size buffers, one being refilled while the other is
//! consumed; everything is single-threaded and cooperative. Games are
//! reported through a [`Visitor`], one callback per header, move and game
//! boundary, so arbitrarily large archives parse in constant memory.

use std::borrow::Cow;
use std::fmt;
use std::io::Read;

/// Size of each of the two input buffers.
const BUFFER_SIZE: usize = 64 * 1024;

/// PGN string tokens (header keys, header values, moves) are limited to
/// 255 bytes.
const MAX_STRING: usize = 255;

/// Parse errors surfaced by [`StreamParser::read_games`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamParserError {
    /// A header key, header value or move token exceeded 255 bytes.
    ExceededMaxStringLength,
    /// A header line was not closed with `]`.
    InvalidHeaderMissingClosingBracket,
    /// A header value was not closed with `"` before the line ended.
    InvalidHeaderMissingClosingQuote,
    /// The input ended before any data could be read.
    NotEnoughData,
}

impl fmt::Display for StreamParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamParserError::ExceededMaxStringLength => {
                write!(f, "string token exceeds {MAX_STRING} bytes")
            }
            StreamParserError::InvalidHeaderMissingClosingBracket => {
                write!(f, "invalid header: missing closing bracket")
            }
            StreamParserError::InvalidHeaderMissingClosingQuote => {
                write!(f, "invalid header: missing closing quote")
            }
            StreamParserError::NotEnoughData => write!(f, "not enough data"),
        }
    }
}

impl std::error::Error for StreamParserError {}

/// Callbacks invoked by the parser as it walks an archive.
///
/// When [`Visitor::skip`] reports true, header and move callbacks for the
/// rest of the current game are suppressed; `end_pgn` still fires.
/// Implementors typically set their skip flag inside `header` and clear
/// it in `start_pgn`.
pub trait Visitor {
    /// A new game starts.
    fn start_pgn(&mut self);

    /// One header tag pair, e.g. `("Event", "Rated Blitz")`.
    fn header(&mut self, key: &str, value: &str);

    /// The header section ended and the move text begins.
    fn start_moves(&mut self);

    /// One move token with its trailing comment, if any.
    fn san_move(&mut self, san: &str, comment: &str);

    /// The current game ended.
    fn end_pgn(&mut self);

    /// Whether the remaining callbacks of the current game should be
    /// suppressed.
    fn skip(&self) -> bool {
        false
    }
}

/// Fixed-capacity token buffer.
struct StringBuffer {
    buf: [u8; MAX_STRING],
    len: usize,
}

impl StringBuffer {
    fn new() -> Self {
        StringBuffer {
            buf: [0; MAX_STRING],
            len: 0,
        }
    }

    fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn clear(&mut self) {
        self.len = 0;
    }

    fn add(&mut self, c: u8) -> bool {
        if self.len >= MAX_STRING {
            return false;
        }
        self.buf[self.len] = c;
        self.len += 1;
        true
    }

    fn as_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.buf[..self.len])
    }
}

/// Double-buffered reader with one byte of lookahead across buffer
/// boundaries. Carriage returns are invisible to the parser.
struct StreamBuffer<R: Read> {
    reader: R,
    buffers: [Box<[u8]>; 2],
    lens: [usize; 2],
    active: usize,
    pos: usize,
    prefetched: bool,
}

impl<R: Read> StreamBuffer<R> {
    fn new(reader: R) -> Self {
        StreamBuffer {
            reader,
            buffers: [
                vec![0; BUFFER_SIZE].into_boxed_slice(),
                vec![0; BUFFER_SIZE].into_boxed_slice(),
            ],
            lens: [0, 0],
            active: 0,
            pos: 0,
            prefetched: false,
        }
    }

    /// Read into the given buffer. Read errors end the stream.
    fn fill_buffer(&mut self, which: usize) -> bool {
        let n = self.reader.read(&mut self.buffers[which]).unwrap_or(0);
        self.lens[which] = n;
        n > 0
    }

    /// Make the next chunk of input the active one: either the prefetched
    /// buffer or a fresh read.
    fn next_chunk(&mut self) -> bool {
        self.pos = 0;
        if self.prefetched {
            self.active ^= 1;
            self.prefetched = false;
            self.lens[self.active] > 0
        } else {
            self.fill_buffer(self.active)
        }
    }

    fn fill(&mut self) -> bool {
        self.next_chunk()
    }

    /// Current character, filling as needed and skipping carriage returns.
    fn some(&mut self) -> Option<u8> {
        loop {
            if self.pos < self.lens[self.active] {
                let c = self.buffers[self.active][self.pos];
                if c == b'\r' {
                    self.pos += 1;
                    continue;
                }
                return Some(c);
            }

            if !self.next_chunk() {
                return None;
            }
        }
    }

    fn advance(&mut self) {
        if self.pos >= self.lens[self.active] {
            self.next_chunk();
        }
        self.pos += 1;
    }

    fn current(&mut self) -> Option<u8> {
        if self.pos >= self.lens[self.active] && !self.next_chunk() {
            return None;
        }
        if self.pos < self.lens[self.active] {
            Some(self.buffers[self.active][self.pos])
        } else {
            None
        }
    }

    /// One byte of lookahead; prefetches the second buffer at a boundary.
    fn peek(&mut self) -> Option<u8> {
        if self.pos + 1 < self.lens[self.active] {
            return Some(self.buffers[self.active][self.pos + 1]);
        }

        if !self.prefetched {
            let other = self.active ^ 1;
            if !self.fill_buffer(other) {
                return None;
            }
            self.prefetched = true;
        }

        let other = self.active ^ 1;
        if self.lens[other] > 0 {
            Some(self.buffers[other][0])
        } else {
            None
        }
    }

    /// Skip a balanced delimiter region; the current character is assumed
    /// to be the opening delimiter.
    fn skip_until(&mut self, open: u8, close: u8) -> bool {
        let mut depth = 0i32;

        loop {
            let Some(c) = self.some() else {
                return false;
            };
            self.advance();

            if c == open {
                depth += 1;
            } else if c == close {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
                if depth == 0 {
                    return true;
                }
            }
        }
    }
}

fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r')
}

/// The streaming parser itself. Construct with [`StreamParser::new`] and
/// drive with [`StreamParser::read_games`].
pub struct StreamParser<R: Read> {
    stream: StreamBuffer<R>,

    header_key: StringBuffer,
    header_value: StringBuffer,
    move_token: StringBuffer,
    comment: Vec<u8>,

    in_header: bool,
    in_body: bool,
    pgn_end: bool,
    keep_position_after_body: bool,
    error: Option<StreamParserError>,
}

impl<R: Read> StreamParser<R> {
    /// Wrap an input source.
    pub fn new(reader: R) -> Self {
        StreamParser {
            stream: StreamBuffer::new(reader),
            header_key: StringBuffer::new(),
            header_value: StringBuffer::new(),
            move_token: StringBuffer::new(),
            comment: Vec::new(),
            in_header: true,
            in_body: false,
            pgn_end: true,
            keep_position_after_body: false,
            error: None,
        }
    }

    /// Parse every game in the input, reporting them to `visitor`.
    pub fn read_games<V: Visitor + ?Sized>(
        &mut self,
        visitor: &mut V,
    ) -> Result<(), StreamParserError> {
        if !self.stream.fill() {
            return Err(StreamParserError::NotEnoughData);
        }

        while let Some(c) = self.stream.some() {
            if self.in_header {
                if c == b'[' {
                    visitor.start_pgn();
                    self.pgn_end = false;

                    self.process_header(visitor);
                    if let Some(error) = self.error {
                        #[cfg(feature = "logging")]
                        log::debug!("pgn header error: {error}");
                        return Err(error);
                    }
                }
            } else if self.in_body {
                self.process_body(visitor);
                if let Some(error) = self.error {
                    return Err(error);
                }
            }

            if !self.keep_position_after_body {
                self.stream.advance();
            }
            self.keep_position_after_body = false;
        }

        if !self.pgn_end {
            self.end_pgn(visitor);
        }

        Ok(())
    }

    fn reset_trackers(&mut self) {
        self.header_key.clear();
        self.header_value.clear();
        self.move_token.clear();
        self.comment.clear();

        self.in_header = true;
        self.in_body = false;
    }

    fn emit_move<V: Visitor + ?Sized>(&mut self, visitor: &mut V) {
        if !self.move_token.is_empty() {
            if !visitor.skip() {
                visitor.san_move(&self.move_token.as_str(), &String::from_utf8_lossy(&self.comment));
            }
            self.move_token.clear();
            self.comment.clear();
        }
    }

    fn end_pgn<V: Visitor + ?Sized>(&mut self, visitor: &mut V) {
        self.emit_move(visitor);
        visitor.end_pgn();

        self.reset_trackers();
        self.pgn_end = true;
    }

    fn process_header<V: Visitor + ?Sized>(&mut self, visitor: &mut V) {
        let mut backslash = false;

        while let Some(c) = self.stream.some() {
            match c {
                b'[' => {
                    self.stream.advance();

                    while let Some(k) = self.stream.some() {
                        if is_space(k) {
                            break;
                        }
                        if !self.header_key.add(k) {
                            self.error = Some(StreamParserError::ExceededMaxStringLength);
                            return;
                        }
                        self.stream.advance();
                    }

                    self.stream.advance();
                }
                b'"' => {
                    self.stream.advance();

                    while let Some(k) = self.stream.some() {
                        if k == b'\\' {
                            backslash = true;
                            // the escape itself is not part of the value
                            self.stream.advance();
                        } else if k == b'"' && !backslash {
                            self.stream.advance();

                            if self.stream.current() != Some(b']') {
                                self.error =
                                    Some(StreamParserError::InvalidHeaderMissingClosingBracket);
                                return;
                            }
                            self.stream.advance();
                            break;
                        } else if k == b'\n' {
                            self.error = Some(StreamParserError::InvalidHeaderMissingClosingQuote);
                            return;
                        } else {
                            backslash = false;
                            if !self.header_value.add(k) {
                                self.error = Some(StreamParserError::ExceededMaxStringLength);
                                return;
                            }
                            self.stream.advance();
                        }
                    }

                    // step over a carriage return by hand so the closing
                    // advance below lands on the newline
                    if self.stream.current() == Some(b'\r') {
                        self.stream.advance();
                    }

                    if !visitor.skip() {
                        visitor.header(&self.header_key.as_str(), &self.header_value.as_str());
                    }
                    self.header_key.clear();
                    self.header_value.clear();

                    // step past the newline that ends the header line
                    self.stream.advance();
                }
                b'\n' => {
                    self.in_header = false;
                    self.in_body = true;

                    if !visitor.skip() {
                        visitor.start_moves();
                    }
                    return;
                }
                _ => {
                    // tolerate a missing blank line and fall into the body
                    self.in_header = false;
                    self.in_body = true;

                    if !visitor.skip() {
                        visitor.start_moves();
                    }
                    return;
                }
            }
        }
    }

    fn process_body<V: Visitor + ?Sized>(&mut self, visitor: &mut V) {
        let mut is_termination = false;

        // Games may open with a move number, a comment, or directly with a
        // termination marker.
        loop {
            let mut saw_comment = false;

            while let Some(c) = self.stream.some() {
                if c == b' ' || c.is_ascii_digit() {
                    self.stream.advance();
                } else if c == b'-' || c == b'*' || c == b'/' {
                    is_termination = true;
                    self.stream.advance();
                } else if c == b'{' {
                    saw_comment = true;
                    self.stream.advance();

                    while let Some(k) = self.stream.some() {
                        self.stream.advance();
                        if k == b'}' {
                            break;
                        }
                        self.comment.push(k);
                    }

                    // a comment with no move in front of it still reaches
                    // the visitor
                    if !visitor.skip() {
                        visitor.san_move("", &String::from_utf8_lossy(&self.comment));
                    }
                    self.comment.clear();
                } else {
                    break;
                }
            }

            // a comment followed by the termination marker needs a second
            // look at the marker
            if saw_comment && !is_termination {
                continue;
            }
            break;
        }

        if is_termination {
            self.end_pgn(visitor);
            return;
        }

        while let Some(c) = self.stream.some() {
            if is_space(c) {
                self.stream.advance();
            } else {
                break;
            }
        }

        while let Some(c) = self.stream.some() {
            // A '[' here means the previous game never saw its result
            // token; finish it and re-enter header mode on this character.
            if c == b'[' {
                self.end_pgn(visitor);
                self.keep_position_after_body = true;
                break;
            }

            // move number
            while let Some(c) = self.stream.some() {
                if is_space(c) || c.is_ascii_digit() {
                    self.stream.advance();
                } else {
                    break;
                }
            }

            // dots after the move number
            while let Some(c) = self.stream.some() {
                if c == b'.' {
                    self.stream.advance();
                } else {
                    break;
                }
            }

            while let Some(c) = self.stream.some() {
                if is_space(c) {
                    self.stream.advance();
                } else {
                    break;
                }
            }

            if self.parse_move(visitor) {
                break;
            }

            while let Some(c) = self.stream.some() {
                if is_space(c) {
                    self.stream.advance();
                } else {
                    break;
                }
            }

            let Some(curr) = self.stream.current() else {
                self.end_pgn(visitor);
                break;
            };

            if curr == b'*' {
                self.end_pgn(visitor);
                self.stream.advance();
                break;
            }

            if curr == b'1' {
                match self.stream.peek() {
                    Some(b'-') => {
                        // 1-0
                        self.stream.advance();
                        self.stream.advance();
                        self.end_pgn(visitor);
                        break;
                    }
                    Some(b'/') => {
                        // 1/2-1/2
                        for _ in 0..=6 {
                            self.stream.advance();
                        }
                        self.end_pgn(visitor);
                        break;
                    }
                    _ => {}
                }
            }

            // either the 0-1 result or 0-0 / 0-0-0 castling
            if curr == b'0' && self.stream.peek() == Some(b'-') {
                self.stream.advance();
                self.stream.advance();

                let Some(c) = self.stream.current() else {
                    self.end_pgn(visitor);
                    break;
                };

                if c == b'1' {
                    self.end_pgn(visitor);
                    self.stream.advance();
                    break;
                }

                if !self.move_token.add(b'0') || !self.move_token.add(b'-') {
                    self.error = Some(StreamParserError::ExceededMaxStringLength);
                    return;
                }

                if self.parse_move(visitor) {
                    self.stream.advance();
                    break;
                }
            }
        }
    }

    /// Read one move token plus its appendix. Returns true when the body
    /// is finished.
    fn parse_move<V: Visitor + ?Sized>(&mut self, visitor: &mut V) -> bool {
        while let Some(c) = self.stream.some() {
            if is_space(c) {
                break;
            }

            if !self.move_token.add(c) {
                self.error = Some(StreamParserError::ExceededMaxStringLength);
                return true;
            }

            self.stream.advance();
        }

        self.parse_move_appendix(visitor)
    }

    /// Comments, variations and NAGs following a move.
    fn parse_move_appendix<V: Visitor + ?Sized>(&mut self, visitor: &mut V) -> bool {
        loop {
            let Some(curr) = self.stream.current() else {
                self.end_pgn(visitor);
                return true;
            };

            match curr {
                b'{' => {
                    self.stream.advance();

                    while let Some(c) = self.stream.some() {
                        self.stream.advance();
                        if c == b'}' {
                            break;
                        }
                        self.comment.push(c);
                    }
                }
                b'(' => {
                    // variations are skipped as a balanced region
                    self.stream.skip_until(b'(', b')');
                }
                b'$' => {
                    while let Some(c) = self.stream.some() {
                        if is_space(c) {
                            break;
                        }
                        self.stream.advance();
                    }
                }
                b' ' => {
                    while let Some(c) = self.stream.some() {
                        if !is_space(c) {
                            break;
                        }
                        self.stream.advance();
                    }
                }
                _ => {
                    self.emit_move(visitor);
                    return false;
                }
            }
        }
    }
}
