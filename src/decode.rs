//! Turning captured process output into text.

use encoding_rs::Encoding;
use oem_cp::code_table::DECODING_TABLE_CP850;
use std::fmt;

/// Character encoding used to decode bytes captured from a child process.
#[derive(Clone, Copy, PartialEq)]
pub enum OutputEncoding {
    Utf8,
    /// Code page 850, the default OEM code page of western Windows consoles.
    Cp850,
    /// Any other encoding known to `encoding_rs`.
    Other(&'static Encoding),
}

impl OutputEncoding {
    /// UTF-8 everywhere except Windows, whose console tools emit CP850.
    pub fn platform_default() -> Self {
        if cfg!(windows) {
            OutputEncoding::Cp850
        } else {
            OutputEncoding::Utf8
        }
    }

    /// Looks up an encoding by label (`utf-8`, `cp850`, `windows-1252`, ...).
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_lowercase();
        match label.as_str() {
            "cp850" | "ibm850" | "850" => Some(OutputEncoding::Cp850),
            _ => {
                let encoding = Encoding::for_label(label.as_bytes())?;
                if encoding == encoding_rs::UTF_8 {
                    Some(OutputEncoding::Utf8)
                } else {
                    Some(OutputEncoding::Other(encoding))
                }
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputEncoding::Utf8 => "UTF-8",
            OutputEncoding::Cp850 => "IBM850",
            OutputEncoding::Other(encoding) => encoding.name(),
        }
    }

    /// Decodes `bytes`, replacing malformed sequences with U+FFFD.
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            OutputEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            OutputEncoding::Cp850 => {
                oem_cp::decode_string_complete_table(bytes, &DECODING_TABLE_CP850)
            }
            OutputEncoding::Other(encoding) => {
                let (text, _, _) = encoding.decode(bytes);
                text.into_owned()
            }
        }
    }
}

impl Default for OutputEncoding {
    fn default() -> Self {
        Self::platform_default()
    }
}

impl fmt::Debug for OutputEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OutputEncoding({})", self.name())
    }
}
