//! Object parser: builds structured PDF objects from tokens.

use crate::error::{Result, StreamError};
use crate::model::objects::{Dict, PdfObject, PdfRef};
use crate::parser::lexer::{ContentLexer, Operator, Token};

/// Recursive-descent parser producing `PdfObject` values from a content
/// stream. Comments are skipped; the `<int> <int> R` indirect-reference
/// grammar is folded into a single token with bounded backtracking.
pub struct ObjectParser<'a> {
    pub(crate) lexer: ContentLexer<'a>,
}

impl<'a> ObjectParser<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            lexer: ContentLexer::new(data),
        }
    }

    /// Current position in the stream.
    pub fn tell(&self) -> usize {
        self.lexer.tell()
    }

    /// Reposition the cursor.
    pub fn seek(&mut self, pos: usize) {
        self.lexer.seek(pos);
    }

    /// Next token with comments skipped.
    fn next_raw_token(&mut self) -> Result<Option<(usize, Token)>> {
        loop {
            match self.lexer.next_token() {
                Some(Ok((_, Token::Comment(_)))) => continue,
                Some(Ok(tok)) => return Ok(Some(tok)),
                Some(Err(e)) => return Err(e),
                None => return Ok(None),
            }
        }
    }

    /// Next token with the `<int> <int> R` lookahead pattern folded into a
    /// single `Token::Ref`. This is the one place controlled backtracking
    /// occurs, bounded to two tokens of lookahead: if the pattern does not
    /// complete, the cursor seeks back and the first number stands alone.
    pub fn next_valid_token(&mut self) -> Result<Option<(usize, Token)>> {
        let Some((pos, token)) = self.next_raw_token()? else {
            return Ok(None);
        };

        if let Token::Int(objid) = token {
            if objid >= 0 && objid <= u32::MAX as i64 {
                let rewind = self.lexer.tell();
                if let Some(r) = self.try_fold_reference(objid as u32) {
                    return Ok(Some((pos, Token::Ref(r))));
                }
                self.lexer.seek(rewind);
            }
        }

        Ok(Some((pos, token)))
    }

    fn try_fold_reference(&mut self, objid: u32) -> Option<PdfRef> {
        let genno = match self.next_raw_token() {
            Ok(Some((_, Token::Int(g)))) if (0..=u16::MAX as i64).contains(&g) => g as u16,
            _ => return None,
        };
        match self.next_raw_token() {
            Ok(Some((_, Token::Op(Operator::R)))) => Some(PdfRef::new(objid, genno)),
            _ => None,
        }
    }

    /// Read the next object. Returns `None` at end of input.
    ///
    /// Bare operator tokens come back as `PdfObject::Op`, which is how the
    /// content-stream interpreter sees operators interleaved with operands.
    pub fn read_object(&mut self) -> Result<Option<PdfObject>> {
        let Some((pos, token)) = self.next_valid_token()? else {
            return Ok(None);
        };
        self.object_from_token(pos, token).map(Some)
    }

    pub(crate) fn object_from_token(&mut self, _pos: usize, token: Token) -> Result<PdfObject> {
        match token {
            Token::Int(n) => Ok(PdfObject::Int(n)),
            Token::Real(n) => Ok(PdfObject::Real(n)),
            Token::Bool(b) => Ok(PdfObject::Bool(b)),
            Token::String { bytes, hex } => Ok(PdfObject::String { bytes, hex }),
            Token::Name(name) => Ok(PdfObject::Name(name)),
            Token::Ref(r) => Ok(PdfObject::Ref(r)),
            Token::DictStart => self.read_dict(),
            Token::ArrayStart => self.read_array(),
            Token::Op(Operator::Null) => Ok(PdfObject::Null),
            Token::Op(op) => Ok(PdfObject::Op(op)),
            // Stray closers and comments do not occur here: comments are
            // filtered out and closers are consumed by the container loops,
            // so a top-level closer is unbalanced input kept as-is.
            Token::DictEnd => Ok(PdfObject::Op(Operator::Other(b">>".to_vec()))),
            Token::ArrayEnd => Ok(PdfObject::Op(Operator::Other(b"]".to_vec()))),
            Token::Comment(_) => Ok(PdfObject::Null),
        }
    }

    fn read_dict(&mut self) -> Result<PdfObject> {
        let mut dict = Dict::new();
        loop {
            let Some((pos, token)) = self.next_valid_token()? else {
                return Err(StreamError::UnexpectedEof);
            };
            match token {
                Token::DictEnd => return Ok(PdfObject::Dict(dict)),
                Token::Name(key) => {
                    let Some((vpos, vtoken)) = self.next_valid_token()? else {
                        return Err(StreamError::UnexpectedEof);
                    };
                    let value = self.object_from_token(vpos, vtoken)?;
                    dict.insert(key, value);
                }
                // Dangling `def` between pairs is tolerated for
                // compatibility with PostScript-flavored producers.
                Token::Op(Operator::Def) => continue,
                _ => return Err(StreamError::MalformedDictionary { pos }),
            }
        }
    }

    fn read_array(&mut self) -> Result<PdfObject> {
        let mut items = Vec::new();
        loop {
            let Some((pos, token)) = self.next_valid_token()? else {
                return Err(StreamError::UnexpectedEof);
            };
            match token {
                Token::ArrayEnd => return Ok(PdfObject::Array(items)),
                other => items.push(self.object_from_token(pos, other)?),
            }
        }
    }
}
