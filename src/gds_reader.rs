use log::debug;
use std::path::Path;

use crate::gds_error::{GdsError, GdsResult};
use crate::gds_real::GdsReal;
use crate::gds_record::{self, DataType, Record, RecordData, RECORD_HEADER_LEN};

fn bit_array(byte: &[u8]) -> Vec<u16> {
    byte.chunks_exact(2)
        .map(|w| u16::from_be_bytes([w[0], w[1]]))
        .collect()
}

fn two_byte_int(byte: &[u8]) -> Vec<i16> {
    byte.chunks_exact(2)
        .map(|w| i16::from_be_bytes([w[0], w[1]]))
        .collect()
}

fn four_byte_int(byte: &[u8]) -> Vec<i32> {
    byte.chunks_exact(4)
        .map(|w| i32::from_be_bytes([w[0], w[1], w[2], w[3]]))
        .collect()
}

fn eight_byte_real(byte: &[u8]) -> Vec<GdsReal> {
    byte.chunks_exact(8)
        .map(|w| {
            let mut raw = [0_u8; 8];
            raw.copy_from_slice(w);
            GdsReal::from_bytes(raw)
        })
        .collect()
}

fn ascii_string(byte: &[u8]) -> String {
    // byte for byte, the NUL pad is kept so the record writes back unchanged
    byte.iter().map(|&b| b as char).collect()
}

/// pull records one at a time off an in-memory gdsii stream
pub struct RecordReader<'a> {
    bytes: &'a [u8],
    offset: usize,
    last_record: Option<&'static str>,
    endlib_read: bool,
    finished: bool,
}

impl<'a> RecordReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        RecordReader {
            bytes,
            offset: 0,
            last_record: None,
            endlib_read: false,
            finished: false,
        }
    }

    /// byte offset of the next record
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn error(&self, msg: &str) -> GdsError {
        GdsError::format(self.offset, self.last_record, msg)
    }

    /// decode the next record
    ///
    /// Ok(None) after ENDLIB and its zero padding, or when a stream without
    /// ENDLIB ends on a record boundary
    pub fn next_record(&mut self) -> GdsResult<Option<Record>> {
        if self.finished {
            return Ok(None);
        }
        let remain = &self.bytes[self.offset..];
        if self.endlib_read {
            self.finished = true;
            if remain.iter().any(|&b| b != 0) {
                return Err(self.error(&format!(
                    "{} bytes after ENDLIB are not zero padding",
                    remain.len()
                )));
            }
            if !remain.is_empty() {
                debug!("ignore {} bytes of padding after ENDLIB", remain.len());
            }
            return Ok(None);
        }
        if remain.is_empty() && self.offset > 0 {
            self.finished = true;
            debug!("stream ends at byte {} without ENDLIB", self.offset);
            return Ok(None);
        }
        if remain.len() < RECORD_HEADER_LEN {
            self.finished = true;
            let msg = if self.offset == 0 {
                format!("stream of {} bytes is too short for a record", remain.len())
            } else {
                format!("stream truncated, {} stray bytes left", remain.len())
            };
            return Err(self.error(&msg));
        }

        let len = u16::from_be_bytes([remain[0], remain[1]]) as usize;
        let tag = u16::from_be_bytes([remain[2], remain[3]]);
        let record_tag = match gds_record::lookup_tag(tag) {
            Some(t) => t,
            None => {
                self.finished = true;
                return Err(self.error(&format!("unknown record tag {:#06x}", tag)));
            }
        };
        if len < RECORD_HEADER_LEN {
            self.finished = true;
            return Err(self.error(&format!(
                "{} record length {} is shorter than its header",
                record_tag.name, len
            )));
        }
        if len > remain.len() {
            self.finished = true;
            return Err(self.error(&format!(
                "{} record truncated, needs {} bytes, {} left",
                record_tag.name,
                len,
                remain.len()
            )));
        }

        let payload = &remain[RECORD_HEADER_LEN..len];
        let element_len = record_tag.data_type.element_len();
        let bad_payload = match record_tag.data_type {
            DataType::NoData => !payload.is_empty(),
            _ => payload.len() % element_len != 0,
        };
        if bad_payload {
            self.finished = true;
            return Err(self.error(&format!(
                "{} payload of {} bytes does not fit {:?}",
                record_tag.name,
                payload.len(),
                record_tag.data_type
            )));
        }

        let data = match record_tag.data_type {
            DataType::NoData => RecordData::NoData,
            DataType::BitArray => RecordData::BitArray(bit_array(payload)),
            DataType::TwoByteInt => RecordData::TwoByteInt(two_byte_int(payload)),
            DataType::FourByteInt => RecordData::FourByteInt(four_byte_int(payload)),
            DataType::EightByteReal => RecordData::EightByteReal(eight_byte_real(payload)),
            DataType::Ascii => RecordData::Ascii(ascii_string(payload)),
        };
        debug!("{} at byte {}, {} bytes", record_tag.name, self.offset, len);

        self.offset += len;
        self.last_record = Some(record_tag.name);
        if tag == gds_record::ENDLIB {
            self.endlib_read = true;
        }
        Ok(Some(Record::new(tag, data)))
    }
}

impl<'a> Iterator for RecordReader<'a> {
    type Item = GdsResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

/// decode a whole stream, up to and including ENDLIB when there is one
pub fn decode_records(bytes: &[u8]) -> GdsResult<Vec<Record>> {
    RecordReader::new(bytes).collect()
}

/// read a gdsii file and decode its records
pub fn read_records(file_name: impl AsRef<Path>) -> GdsResult<Vec<Record>> {
    let bytes = std::fs::read(file_name)?;
    decode_records(&bytes)
}
