use super::ConversionError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Str(String),
    Number(String),
    Punct(char),
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn is_punct(&self, ch: char) -> bool {
        self.kind == TokenKind::Punct(ch)
    }

    pub fn is_ident(&self, name: &str) -> bool {
        matches!(&self.kind, TokenKind::Ident(ident) if ident == name)
    }

    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Ident(ident) => format!("identifier '{ident}'"),
            TokenKind::Str(value) => format!("string \"{value}\""),
            TokenKind::Number(value) => format!("number {value}"),
            TokenKind::Punct(ch) => format!("'{ch}'"),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

struct Cursor<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn peek_second(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn error(&self, line: usize, column: usize, message: impl Into<String>) -> ConversionError {
        ConversionError::Syntax {
            line,
            column,
            message: message.into(),
        }
    }
}

/// Splits Ballerina source into tokens. Comments and whitespace are dropped;
/// the returned vector always ends with an `Eof` token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ConversionError> {
    let mut cursor = Cursor::new(source);
    let mut tokens = Vec::new();

    while let Some(ch) = cursor.peek() {
        let (line, column) = (cursor.line, cursor.column);

        if ch.is_whitespace() {
            cursor.bump();
            continue;
        }

        if ch == '/' && cursor.peek_second() == Some('/') {
            while let Some(next) = cursor.peek() {
                if next == '\n' {
                    break;
                }
                cursor.bump();
            }
            continue;
        }

        if ch == '/' && cursor.peek_second() == Some('*') {
            cursor.bump();
            cursor.bump();
            let mut closed = false;
            while let Some(next) = cursor.bump() {
                if next == '*' && cursor.peek() == Some('/') {
                    cursor.bump();
                    closed = true;
                    break;
                }
            }
            if !closed {
                return Err(cursor.error(line, column, "unterminated block comment"));
            }
            continue;
        }

        let kind = if ch == '"' {
            cursor.bump();
            TokenKind::Str(read_string(&mut cursor, line, column)?)
        } else if ch.is_ascii_digit() {
            let mut number = String::new();
            while let Some(next) = cursor.peek() {
                if next.is_ascii_alphanumeric() || next == '.' || next == '_' {
                    number.push(next);
                    cursor.bump();
                } else {
                    break;
                }
            }
            TokenKind::Number(number)
        } else if ch.is_alphabetic() || ch == '_' {
            let mut ident = String::new();
            while let Some(next) = cursor.peek() {
                if next.is_alphanumeric() || next == '_' {
                    ident.push(next);
                    cursor.bump();
                } else {
                    break;
                }
            }
            TokenKind::Ident(ident)
        } else {
            cursor.bump();
            TokenKind::Punct(ch)
        };

        tokens.push(Token { kind, line, column });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        line: cursor.line,
        column: cursor.column,
    });
    Ok(tokens)
}

fn read_string(
    cursor: &mut Cursor<'_>,
    line: usize,
    column: usize,
) -> Result<String, ConversionError> {
    let mut value = String::new();
    loop {
        match cursor.bump() {
            Some('"') => return Ok(value),
            Some('\\') => {
                let escaped = match cursor.bump() {
                    Some('n') => '\n',
                    Some('t') => '\t',
                    Some('r') => '\r',
                    Some(other) => other,
                    None => break,
                };
                value.push(escaped);
            }
            Some('\n') | None => break,
            Some(other) => value.push(other),
        }
    }
    Err(cursor.error(line, column, "unterminated string literal"))
}
