use crate::error::FormatError;
use crate::link::Link;

/// Splits a header into tokens separated by delimiter characters. Which
/// characters delimit is decided per call. All delimiters are ASCII.
struct Tokenizer<'a> {
    rest: &'a str,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Tokenizer<'a> {
        Tokenizer { rest: input }
    }

    fn skip_whitespace(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn at_end(&self) -> bool {
        self.rest.is_empty()
    }

    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// Consumes and returns everything up to, not including, the first of
    /// `delims` or the end of input. May be empty.
    fn until(&mut self, delims: &str) -> &'a str {
        let end = self.rest.find(|c| delims.contains(c)).unwrap_or(self.rest.len());
        let (token, rest) = self.rest.split_at(end);
        self.rest = rest;
        token
    }

    /// The token an error reports as found: the next delimiter, the text up
    /// to it, or `None` at the end of input.
    fn found(&self, delims: &str) -> Option<&'a str> {
        match self.rest.find(|c| delims.contains(c)) {
            _ if self.rest.is_empty() => None,
            Some(0) => Some(&self.rest[..1]),
            Some(end) => Some(&self.rest[..end]),
            None => Some(self.rest),
        }
    }

    /// Skips whitespace, then consumes one of the characters in `delims`.
    fn expect(&mut self, delims: &'static str) -> Result<char, FormatError> {
        self.skip_whitespace();
        match self.peek() {
            Some(c) if delims.contains(c) => {
                self.rest = &self.rest[1..];
                Ok(c)
            }
            _ => Err(FormatError::new(delims, self.found(delims))),
        }
    }
}

/// Parses an RFC 5988 `Link` header value:
///
/// ```text
/// Link       = link-value *( "," link-value )
/// link-value = "<" URI-Reference ">" *( ";" name "=" ( token | quoted-string ) )
/// ```
///
/// Quoted values may contain `;` and `,`. The URI is taken as-is.
pub(crate) fn parse_links(header: &str) -> Result<Vec<Link>, FormatError> {
    let mut tokens = Tokenizer::new(header);
    let mut links = Vec::new();

    loop {
        tokens.expect("<")?;
        let uri = tokens.until(">");
        if uri.is_empty() {
            return Err(FormatError::new("URI", tokens.found(">")));
        }
        tokens.expect(">")?;

        let mut link = Link::new(uri, Vec::<(String, String)>::new());
        let more = loop {
            tokens.skip_whitespace();
            if tokens.at_end() {
                break false;
            }

            if tokens.expect(";,")? == ',' {
                break true;
            }

            let name = tokens.until("=;,").trim();
            if name.is_empty() {
                return Err(FormatError::new("parameter name", tokens.found("=;,")));
            }

            tokens.expect("=")?;
            tokens.skip_whitespace();
            let value = if tokens.peek() == Some('"') {
                tokens.expect("\"")?;
                let value = tokens.until("\"");
                tokens.expect("\"")?;
                value
            } else {
                tokens.until(";,").trim_end()
            };

            link.set(name, value);
        };

        links.push(link);
        tokens.skip_whitespace();
        if !more || tokens.at_end() {
            return Ok(links);
        }
    }
}
