//! PDF object types for content-stream processing.

use crate::error::{Result, StreamError};
use crate::parser::lexer::Operator;
use bytes::Bytes;
use indexmap::IndexMap;

/// Dictionary type used throughout the crate.
///
/// Insertion order is semantically irrelevant in PDF, but keeping it makes
/// re-serialization deterministic, which the rewrite engine relies on.
pub type Dict = IndexMap<String, PdfObject>;

/// PDF object - the fundamental value type of the content-stream layer.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfObject {
    /// Null object
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Real (floating point) value
    Real(f64),
    /// Name object (e.g., /OC, /Artifact)
    Name(String),
    /// String (byte array); `hex` records which written form produced it
    String { bytes: Vec<u8>, hex: bool },
    /// Array of objects
    Array(Vec<Self>),
    /// Dictionary (name -> object mapping)
    Dict(Dict),
    /// Stream (dictionary + binary data)
    Stream(Box<PdfStream>),
    /// Indirect object reference
    Ref(PdfRef),
    /// Bare content-stream operator, only produced while parsing streams
    Op(Operator),
    /// Parsed inline image, synthesized by the BI sub-parser
    InlineImage(Box<InlineImage>),
}

impl PdfObject {
    /// Build a literal string object.
    pub fn literal_string(bytes: impl Into<Vec<u8>>) -> Self {
        Self::String {
            bytes: bytes.into(),
            hex: false,
        }
    }

    /// Check if this is a null object
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Get as boolean
    pub const fn as_bool(&self) -> Result<bool> {
        match self {
            Self::Bool(b) => Ok(*b),
            _ => Err(StreamError::TypeError {
                expected: "bool",
                got: self.type_name(),
            }),
        }
    }

    /// Get as integer
    pub const fn as_int(&self) -> Result<i64> {
        match self {
            Self::Int(n) => Ok(*n),
            _ => Err(StreamError::TypeError {
                expected: "int",
                got: self.type_name(),
            }),
        }
    }

    /// Get numeric value (int or real coerced to f64)
    pub const fn as_num(&self) -> Result<f64> {
        match self {
            Self::Int(n) => Ok(*n as f64),
            Self::Real(n) => Ok(*n),
            _ => Err(StreamError::TypeError {
                expected: "number",
                got: self.type_name(),
            }),
        }
    }

    /// Get as name string
    pub fn as_name(&self) -> Result<&str> {
        match self {
            Self::Name(s) => Ok(s),
            _ => Err(StreamError::TypeError {
                expected: "name",
                got: self.type_name(),
            }),
        }
    }

    /// Get as byte string
    pub fn as_string(&self) -> Result<&[u8]> {
        match self {
            Self::String { bytes, .. } => Ok(bytes),
            _ => Err(StreamError::TypeError {
                expected: "string",
                got: self.type_name(),
            }),
        }
    }

    /// Get as array
    pub const fn as_array(&self) -> Result<&Vec<Self>> {
        match self {
            Self::Array(arr) => Ok(arr),
            _ => Err(StreamError::TypeError {
                expected: "array",
                got: self.type_name(),
            }),
        }
    }

    /// Get as dictionary
    pub const fn as_dict(&self) -> Result<&Dict> {
        match self {
            Self::Dict(d) => Ok(d),
            _ => Err(StreamError::TypeError {
                expected: "dict",
                got: self.type_name(),
            }),
        }
    }

    /// Get as stream
    pub fn as_stream(&self) -> Result<&PdfStream> {
        match self {
            Self::Stream(s) => Ok(s),
            _ => Err(StreamError::TypeError {
                expected: "stream",
                got: self.type_name(),
            }),
        }
    }

    /// Get as object reference
    pub const fn as_pdf_ref(&self) -> Result<&PdfRef> {
        match self {
            Self::Ref(r) => Ok(r),
            _ => Err(StreamError::TypeError {
                expected: "ref",
                got: self.type_name(),
            }),
        }
    }

    /// Get as operator
    pub const fn as_op(&self) -> Result<&Operator> {
        match self {
            Self::Op(op) => Ok(op),
            _ => Err(StreamError::TypeError {
                expected: "operator",
                got: self.type_name(),
            }),
        }
    }

    /// Get type name for error messages
    const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Real(_) => "real",
            Self::Name(_) => "name",
            Self::String { .. } => "string",
            Self::Array(_) => "array",
            Self::Dict(_) => "dict",
            Self::Stream(_) => "stream",
            Self::Ref(_) => "ref",
            Self::Op(_) => "operator",
            Self::InlineImage(_) => "inline image",
        }
    }
}

/// PDF indirect object reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PdfRef {
    /// Object ID
    pub objid: u32,
    /// Generation number
    pub genno: u16,
}

impl PdfRef {
    /// Create a new object reference.
    pub const fn new(objid: u32, genno: u16) -> Self {
        Self { objid, genno }
    }
}

/// PDF stream - dictionary attributes + binary payload.
///
/// The payload is the raw (possibly filter-encoded) data; decoding is the
/// `StreamDecoder` collaborator's job.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfStream {
    /// Stream dictionary attributes
    pub attrs: Dict,
    /// Raw (possibly encoded) data
    rawdata: Bytes,
}

impl PdfStream {
    /// Create a new stream.
    pub fn new(attrs: Dict, rawdata: impl Into<Bytes>) -> Self {
        Self {
            attrs,
            rawdata: rawdata.into(),
        }
    }

    /// Get raw (undecoded) data.
    pub fn rawdata(&self) -> &[u8] {
        self.rawdata.as_ref()
    }

    /// Get raw data as shared bytes.
    pub fn rawdata_bytes(&self) -> Bytes {
        self.rawdata.clone()
    }

    /// Replace the raw payload, keeping the attribute dictionary.
    pub fn set_rawdata(&mut self, data: Vec<u8>) {
        self.rawdata = Bytes::from(data);
    }

    /// Get attribute by name.
    pub fn get(&self, name: &str) -> Option<&PdfObject> {
        self.attrs.get(name)
    }

    /// Get attribute, trying multiple names.
    pub fn get_any(&self, names: &[&str]) -> Option<&PdfObject> {
        for name in names {
            if let Some(obj) = self.attrs.get(*name) {
                return Some(obj);
            }
        }
        None
    }
}

/// A parsed inline image: expanded dictionary plus raw sample bytes.
///
/// Built transiently by the BI sub-parser and handed to the interpreter as
/// a synthetic operand.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    /// Image dictionary with abbreviations already expanded
    pub dict: Dict,
    /// Raw (still filter-encoded, if a Filter is present) sample bytes
    pub data: Vec<u8>,
}
