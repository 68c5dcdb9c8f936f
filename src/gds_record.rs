// gdsii record format
//
//  Bit 0                                   16
//      |  Total record length(in bytes)    |
//      |  Record Type     |    Data Type   |
//      |       Data content....            |
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::io::Write;

use crate::gds_error::{GdsError, GdsResult};
use crate::gds_real::GdsReal;

pub const HEADER: u16 = 0x0002;
pub const BGNLIB: u16 = 0x0102;
pub const LIBNAME: u16 = 0x0206;
pub const UNITS: u16 = 0x0305;
pub const ENDLIB: u16 = 0x0400;
pub const BGNSTR: u16 = 0x0502;
pub const STRNAME: u16 = 0x0606;
pub const ENDSTR: u16 = 0x0700;
pub const BOUNDARY: u16 = 0x0800;
pub const PATH: u16 = 0x0900;
pub const SREF: u16 = 0x0a00;
pub const AREF: u16 = 0x0b00;
pub const TEXT: u16 = 0x0c00;
pub const LAYER: u16 = 0x0d02;
pub const DATATYPE: u16 = 0x0e02;
pub const WIDTH: u16 = 0x0f03;
pub const XY: u16 = 0x1003;
pub const ENDEL: u16 = 0x1100;
pub const SNAME: u16 = 0x1206;
pub const COLROW: u16 = 0x1302;
pub const NODE: u16 = 0x1500;
pub const TEXTTYPE: u16 = 0x1602;
pub const PRESENTATION: u16 = 0x1701;
pub const STRING: u16 = 0x1906;
pub const STRANS: u16 = 0x1a01;
pub const MAG: u16 = 0x1b05;
pub const ANGLE: u16 = 0x1c05;
pub const REFLIBS: u16 = 0x1f06;
pub const FONTS: u16 = 0x2006;
pub const PATHTYPE: u16 = 0x2102;
pub const GENERATIONS: u16 = 0x2202;
pub const ATTRTABLE: u16 = 0x2306;
pub const ELFLAGS: u16 = 0x2601;
pub const NODETYPE: u16 = 0x2a02;
pub const PROPATTR: u16 = 0x2b02;
pub const PROPVALUE: u16 = 0x2c06;
pub const BOX: u16 = 0x2d00;
pub const BOXTYPE: u16 = 0x2e02;
pub const PLEX: u16 = 0x2f03;
pub const TAPENUM: u16 = 0x3203;
pub const TAPECODE: u16 = 0x3302;
pub const FORMAT: u16 = 0x3602;
pub const MASK: u16 = 0x3706;
pub const ENDMASKS: u16 = 0x3800;

/// record header size in bytes, length word plus tag word
pub const RECORD_HEADER_LEN: usize = 4;
/// largest record the 16 bit length word can frame
pub const MAX_RECORD_LEN: usize = u16::MAX as usize;

/// payload element kind, low byte of the record tag
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    NoData = 0x00,
    BitArray = 0x01,
    TwoByteInt = 0x02,
    FourByteInt = 0x03,
    EightByteReal = 0x05,
    Ascii = 0x06,
}

impl DataType {
    /// size in bytes of one payload element
    pub fn element_len(&self) -> usize {
        match self {
            DataType::NoData => 0,
            DataType::BitArray => 2,
            DataType::TwoByteInt => 2,
            DataType::FourByteInt => 4,
            DataType::EightByteReal => 8,
            DataType::Ascii => 1,
        }
    }
}

impl TryFrom<u8> for DataType {
    type Error = GdsError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(DataType::NoData),
            0x01 => Ok(DataType::BitArray),
            0x02 => Ok(DataType::TwoByteInt),
            0x03 => Ok(DataType::FourByteInt),
            0x05 => Ok(DataType::EightByteReal),
            0x06 => Ok(DataType::Ascii),
            _ => Err(GdsError::format(
                0,
                None,
                &format!("unknown data type {:#04x}", value),
            )),
        }
    }
}

/// one entry of the record tag table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordTag {
    pub tag: u16,
    pub name: &'static str,
    pub data_type: DataType,
}

const TAG_NAMES: [(u16, &str); 44] = [
    (HEADER, "HEADER"),
    (BGNLIB, "BGNLIB"),
    (LIBNAME, "LIBNAME"),
    (UNITS, "UNITS"),
    (ENDLIB, "ENDLIB"),
    (BGNSTR, "BGNSTR"),
    (STRNAME, "STRNAME"),
    (ENDSTR, "ENDSTR"),
    (BOUNDARY, "BOUNDARY"),
    (PATH, "PATH"),
    (SREF, "SREF"),
    (AREF, "AREF"),
    (TEXT, "TEXT"),
    (LAYER, "LAYER"),
    (DATATYPE, "DATATYPE"),
    (WIDTH, "WIDTH"),
    (XY, "XY"),
    (ENDEL, "ENDEL"),
    (SNAME, "SNAME"),
    (COLROW, "COLROW"),
    (NODE, "NODE"),
    (TEXTTYPE, "TEXTTYPE"),
    (PRESENTATION, "PRESENTATION"),
    (STRING, "STRING"),
    (STRANS, "STRANS"),
    (MAG, "MAG"),
    (ANGLE, "ANGLE"),
    (REFLIBS, "REFLIBS"),
    (FONTS, "FONTS"),
    (PATHTYPE, "PATHTYPE"),
    (GENERATIONS, "GENERATIONS"),
    (ATTRTABLE, "ATTRTABLE"),
    (ELFLAGS, "ELFLAGS"),
    (NODETYPE, "NODETYPE"),
    (PROPATTR, "PROPATTR"),
    (PROPVALUE, "PROPVALUE"),
    (BOX, "BOX"),
    (BOXTYPE, "BOXTYPE"),
    (PLEX, "PLEX"),
    (TAPENUM, "TAPENUM"),
    (TAPECODE, "TAPECODE"),
    (FORMAT, "FORMAT"),
    (MASK, "MASK"),
    (ENDMASKS, "ENDMASKS"),
];

lazy_static! {
    static ref TAG_TABLE: HashMap<u16, RecordTag> = TAG_NAMES
        .iter()
        .filter_map(|&(tag, name)| {
            // every tag in the table carries a known data type in its low byte
            DataType::try_from((tag & 0xff) as u8)
                .ok()
                .map(|data_type| {
                    (
                        tag,
                        RecordTag {
                            tag,
                            name,
                            data_type,
                        },
                    )
                })
        })
        .collect();
}

/// look up a record tag, None for tags this kit does not know
pub fn lookup_tag(tag: u16) -> Option<&'static RecordTag> {
    TAG_TABLE.get(&tag)
}

/// decoded payload of a record
#[derive(Debug, Clone, PartialEq)]
pub enum RecordData {
    NoData,
    BitArray(Vec<u16>),
    TwoByteInt(Vec<i16>),
    FourByteInt(Vec<i32>),
    EightByteReal(Vec<GdsReal>),
    /// bytes kept verbatim, one char per byte, including any NUL padding
    Ascii(String),
}

impl RecordData {
    pub fn data_type(&self) -> DataType {
        match self {
            RecordData::NoData => DataType::NoData,
            RecordData::BitArray(_) => DataType::BitArray,
            RecordData::TwoByteInt(_) => DataType::TwoByteInt,
            RecordData::FourByteInt(_) => DataType::FourByteInt,
            RecordData::EightByteReal(_) => DataType::EightByteReal,
            RecordData::Ascii(_) => DataType::Ascii,
        }
    }

    fn payload_len(&self) -> usize {
        let count = match self {
            RecordData::NoData => 0,
            RecordData::BitArray(v) => v.len(),
            RecordData::TwoByteInt(v) => v.len(),
            RecordData::FourByteInt(v) => v.len(),
            RecordData::EightByteReal(v) => v.len(),
            RecordData::Ascii(s) => s.chars().count(),
        };
        count * self.data_type().element_len()
    }
}

/// one gdsii record, tag plus payload
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub tag: u16,
    pub data: RecordData,
}

impl Record {
    pub fn new(tag: u16, data: RecordData) -> Self {
        Record { tag, data }
    }

    pub fn no_data(tag: u16) -> Self {
        Record::new(tag, RecordData::NoData)
    }

    pub fn bit_array(tag: u16, flags: u16) -> Self {
        Record::new(tag, RecordData::BitArray(vec![flags]))
    }

    pub fn two_byte_int(tag: u16, values: Vec<i16>) -> Self {
        Record::new(tag, RecordData::TwoByteInt(values))
    }

    pub fn four_byte_int(tag: u16, values: Vec<i32>) -> Self {
        Record::new(tag, RecordData::FourByteInt(values))
    }

    pub fn eight_byte_real(tag: u16, values: &[f64]) -> GdsResult<Self> {
        let reals = values
            .iter()
            .map(|&v| GdsReal::from_f64(v))
            .collect::<GdsResult<Vec<_>>>()?;
        Ok(Record::new(tag, RecordData::EightByteReal(reals)))
    }

    /// ascii record, padded with one NUL to an even byte count
    pub fn ascii(tag: u16, s: &str) -> GdsResult<Self> {
        if !s.is_ascii() {
            return Err(validation_err!("{} is not ascii", s));
        }
        let mut text = s.to_string();
        if text.len() % 2 != 0 {
            text.push('\0');
        }
        Ok(Record::new(tag, RecordData::Ascii(text)))
    }

    /// record name from the tag table
    pub fn name(&self) -> &'static str {
        lookup_tag(self.tag).map(|t| t.name).unwrap_or("UNKNOWN")
    }

    /// text payload with trailing NUL padding removed
    pub fn text(&self) -> Option<&str> {
        match &self.data {
            RecordData::Ascii(s) => Some(s.trim_end_matches('\0')),
            _ => None,
        }
    }

    /// total framed length, header included
    pub fn encoded_len(&self) -> usize {
        RECORD_HEADER_LEN + self.data.payload_len()
    }

    /// header only, like ENDEL or ENDLIB
    pub fn has_no_payload(&self) -> bool {
        self.data.payload_len() == 0
    }

    /// frame the record as big endian bytes
    pub fn encode<W: Write>(&self, writer: &mut W) -> GdsResult<()> {
        let tag = match lookup_tag(self.tag) {
            Some(tag) => tag,
            None => {
                return Err(GdsError::format(
                    0,
                    None,
                    &format!("can not encode unknown record tag {:#06x}", self.tag),
                ))
            }
        };
        if tag.data_type != self.data.data_type() {
            return Err(GdsError::format(
                0,
                Some(tag.name),
                &format!(
                    "{} carries {:?} data, got {:?}",
                    tag.name,
                    tag.data_type,
                    self.data.data_type()
                ),
            ));
        }
        let len = self.encoded_len();
        if len > MAX_RECORD_LEN {
            return Err(GdsError::format(
                0,
                Some(tag.name),
                &format!("{} record of {} bytes exceeds {}", tag.name, len, MAX_RECORD_LEN),
            ));
        }

        // gds data binary format is in big endian
        let mut data = Vec::<u8>::with_capacity(len);
        data.extend((len as u16).to_be_bytes());
        data.extend(self.tag.to_be_bytes());
        match &self.data {
            RecordData::NoData => {}
            RecordData::BitArray(v) => v.iter().for_each(|w| data.extend(w.to_be_bytes())),
            RecordData::TwoByteInt(v) => v.iter().for_each(|i| data.extend(i.to_be_bytes())),
            RecordData::FourByteInt(v) => v.iter().for_each(|i| data.extend(i.to_be_bytes())),
            RecordData::EightByteReal(v) => v.iter().for_each(|r| data.extend(r.bytes())),
            RecordData::Ascii(s) => data.extend(s.chars().map(|c| c as u8)),
        }
        writer.write_all(&data)?;
        Ok(())
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "/*--------------------------------------*/")?;
        writeln!(f, "Record type: {} ({:#06x})", self.name(), self.tag)?;
        writeln!(f, "Record size {} bytes", self.encoded_len())?;
        match &self.data {
            RecordData::NoData => write!(f, "((No data present))"),
            RecordData::BitArray(v) => {
                let words: Vec<String> = v.iter().map(|w| format!("{:016b}", w)).collect();
                write!(f, "{}", words.join(" "))
            }
            RecordData::TwoByteInt(v) => {
                let nums: Vec<String> = v.iter().map(|i| i.to_string()).collect();
                write!(f, "{}", nums.join(" "))
            }
            RecordData::FourByteInt(v) => {
                let nums: Vec<String> = v.iter().map(|i| i.to_string()).collect();
                write!(f, "{}", nums.join(" "))
            }
            RecordData::EightByteReal(v) => {
                let nums: Vec<String> = v.iter().map(|r| format!("{:e}", r.value())).collect();
                write!(f, "{}", nums.join(" "))
            }
            RecordData::Ascii(s) => write!(f, "{}", s.trim_end_matches('\0')),
        }
    }
}

#[cfg(test)]
mod test_gds_record {
    use super::*;

    #[test]
    fn test_tag_table() {
        assert_eq!(TAG_TABLE.len(), TAG_NAMES.len());
        let xy = lookup_tag(XY).unwrap();
        assert_eq!(xy.name, "XY");
        assert_eq!(xy.data_type, DataType::FourByteInt);
        assert_eq!(lookup_tag(UNITS).unwrap().data_type, DataType::EightByteReal);
        assert_eq!(lookup_tag(ENDMASKS).unwrap().data_type, DataType::NoData);
        assert_eq!(lookup_tag(STRANS).unwrap().data_type, DataType::BitArray);
        // TEXTNODE and SPACING are not part of the table
        assert!(lookup_tag(0x1400).is_none());
        assert!(lookup_tag(0x1802).is_none());
    }

    #[test]
    fn test_encode_layer() {
        let mut buf = Vec::new();
        Record::two_byte_int(LAYER, vec![5]).encode(&mut buf).unwrap();
        assert_eq!(buf, vec![0x00, 0x06, 0x0d, 0x02, 0x00, 0x05]);
    }

    #[test]
    fn test_encode_ascii_padding() {
        let rec = Record::ascii(STRNAME, "MyCell1").unwrap();
        assert_eq!(rec.encoded_len(), 12);
        assert!(!rec.has_no_payload());
        assert!(Record::no_data(ENDEL).has_no_payload());
        assert_eq!(Record::no_data(ENDEL).encoded_len(), 4);
        assert_eq!(rec.text(), Some("MyCell1"));
        let mut buf = Vec::new();
        rec.encode(&mut buf).unwrap();
        assert_eq!(&buf[..4], &[0x00, 0x0c, 0x06, 0x06]);
        assert_eq!(&buf[4..], b"MyCell1\0");

        assert!(Record::ascii(STRNAME, "caf\u{e9}").is_err());
    }

    #[test]
    fn test_encode_mismatch() {
        let mut buf = Vec::new();
        let wrong_kind = Record::four_byte_int(LAYER, vec![1]);
        assert!(matches!(
            wrong_kind.encode(&mut buf),
            Err(GdsError::Format { .. })
        ));
        let unknown = Record::no_data(0x1400);
        assert!(matches!(unknown.encode(&mut buf), Err(GdsError::Format { .. })));
        let too_long = Record::four_byte_int(XY, vec![0; 16384]);
        assert!(matches!(too_long.encode(&mut buf), Err(GdsError::Format { .. })));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_display() {
        let rec = Record::two_byte_int(COLROW, vec![3, 2]);
        let text = rec.to_string();
        assert!(text.contains("Record type: COLROW (0x1302)"));
        assert!(text.contains("Record size 8 bytes"));
        assert!(text.ends_with("3 2"));

        let text = Record::no_data(ENDEL).to_string();
        assert!(text.ends_with("((No data present))"));

        let text = Record::eight_byte_real(MAG, &[2.0]).unwrap().to_string();
        assert!(text.ends_with("2e0"));
    }
}
